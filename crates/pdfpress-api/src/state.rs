//! Shared state handed to every handler.

use pdfpress_compress::CompressionService;
use pdfpress_telemetry::Metrics;

pub(crate) struct ApiState {
    pub(crate) service: CompressionService,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    pub(crate) const fn new(service: CompressionService, telemetry: Metrics) -> Self {
        Self { service, telemetry }
    }
}
