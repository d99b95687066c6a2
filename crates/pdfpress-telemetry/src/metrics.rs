//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes the counters/gauges relevant to the compression service.

use std::sync::Arc;

use prometheus::core::Collector;
use prometheus::{
    Encoder, Gauge, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

use crate::error::{MetricsStage, Result, TelemetryError};

/// Terminal state of a compression job, used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The compressor produced an output document.
    Succeeded,
    /// The request was rejected before any file I/O.
    Rejected,
    /// The compressor or surrounding I/O failed.
    Failed,
}

impl JobOutcome {
    /// Label value recorded for this outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    compress_jobs_total: IntCounterVec,
    compress_bytes_in_total: IntCounter,
    compress_bytes_out_total: IntCounter,
    compress_last_ratio_percent: Gauge,
    compressor_available: IntGauge,
}

/// Snapshot of selected gauges and counters.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// Total bytes accepted for compression.
    pub compress_bytes_in_total: u64,
    /// Total bytes produced by the compressor.
    pub compress_bytes_out_total: u64,
    /// Savings ratio (percent) of the most recent successful job.
    pub compress_last_ratio_percent: f64,
    /// Whether the last health probe found the compressor.
    pub compressor_available: bool,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = collector(
            "http_requests_total",
            IntCounterVec::new(
                Opts::new("http_requests_total", "Total HTTP requests received"),
                &["route", "code"],
            ),
        )?;
        let compress_jobs_total = collector(
            "compress_jobs_total",
            IntCounterVec::new(
                Opts::new("compress_jobs_total", "Compression jobs by quality and outcome"),
                &["quality", "outcome"],
            ),
        )?;
        let compress_bytes_in_total = collector(
            "compress_bytes_in_total",
            IntCounter::with_opts(Opts::new(
                "compress_bytes_in_total",
                "Bytes of uploaded documents handed to the compressor",
            )),
        )?;
        let compress_bytes_out_total = collector(
            "compress_bytes_out_total",
            IntCounter::with_opts(Opts::new(
                "compress_bytes_out_total",
                "Bytes of compressed documents returned to clients",
            )),
        )?;
        let compress_last_ratio_percent = collector(
            "compress_last_ratio_percent",
            Gauge::with_opts(Opts::new(
                "compress_last_ratio_percent",
                "Size reduction of the most recent successful job (percent)",
            )),
        )?;
        let compressor_available = collector(
            "compressor_available",
            IntGauge::with_opts(Opts::new(
                "compressor_available",
                "Whether the external compressor answered the last probe",
            )),
        )?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "compress_jobs_total", &compress_jobs_total)?;
        register(&registry, "compress_bytes_in_total", &compress_bytes_in_total)?;
        register(&registry, "compress_bytes_out_total", &compress_bytes_out_total)?;
        register(
            &registry,
            "compress_last_ratio_percent",
            &compress_last_ratio_percent,
        )?;
        register(&registry, "compressor_available", &compressor_available)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                compress_jobs_total,
                compress_bytes_in_total,
                compress_bytes_out_total,
                compress_last_ratio_percent,
                compressor_available,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        let code = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[route, code.as_str()])
            .inc();
    }

    /// Count a finished compression job.
    pub fn inc_compress_job(&self, quality: &str, outcome: JobOutcome) {
        self.inner
            .compress_jobs_total
            .with_label_values(&[quality, outcome.as_str()])
            .inc();
    }

    /// Record the sizes and ratio of a successful compression job.
    pub fn observe_compression(&self, original_bytes: u64, compressed_bytes: u64, ratio: f64) {
        self.inner.compress_bytes_in_total.inc_by(original_bytes);
        self.inner.compress_bytes_out_total.inc_by(compressed_bytes);
        self.inner.compress_last_ratio_percent.set(ratio);
    }

    /// Record the result of the latest compressor availability probe.
    pub fn set_compressor_available(&self, available: bool) {
        self.inner.compressor_available.set(i64::from(available));
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::metrics(MetricsStage::Encode, None, source))?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::Exposition { source })
    }

    /// Take a point-in-time snapshot of the most relevant gauges and counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            compress_bytes_in_total: self.inner.compress_bytes_in_total.get(),
            compress_bytes_out_total: self.inner.compress_bytes_out_total.get(),
            compress_last_ratio_percent: self.inner.compress_last_ratio_percent.get(),
            compressor_available: self.inner.compressor_available.get() == 1,
        }
    }

    /// Current count of jobs for the given quality and outcome.
    #[must_use]
    pub fn compress_jobs(&self, quality: &str, outcome: JobOutcome) -> u64 {
        self.inner
            .compress_jobs_total
            .with_label_values(&[quality, outcome.as_str()])
            .get()
    }
}

fn collector<C>(name: &'static str, built: prometheus::Result<C>) -> Result<C> {
    built.map_err(|source| TelemetryError::metrics(MetricsStage::Build, Some(name), source))
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::metrics(MetricsStage::Register, Some(name), source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_snapshot_reflects_updates() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.inc_http_request("/compress", 200);
        metrics.inc_compress_job("medium", JobOutcome::Succeeded);
        metrics.inc_compress_job("medium", JobOutcome::Succeeded);
        metrics.inc_compress_job("ultra", JobOutcome::Rejected);
        metrics.observe_compression(1_000, 400, 60.0);
        metrics.observe_compression(500, 600, -20.0);
        metrics.set_compressor_available(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.compress_bytes_in_total, 1_500);
        assert_eq!(snapshot.compress_bytes_out_total, 1_000);
        assert!((snapshot.compress_last_ratio_percent + 20.0).abs() < f64::EPSILON);
        assert!(snapshot.compressor_available);
        assert_eq!(metrics.compress_jobs("medium", JobOutcome::Succeeded), 2);
        assert_eq!(metrics.compress_jobs("ultra", JobOutcome::Rejected), 1);
        assert_eq!(metrics.compress_jobs("low", JobOutcome::Failed), 0);

        let rendered = metrics.render()?;
        assert!(rendered.contains("http_requests_total"));
        assert!(rendered.contains("compress_jobs_total"));
        assert!(rendered.contains("compressor_available 1"));
        Ok(())
    }

    #[test]
    fn compressor_gauge_toggles() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.set_compressor_available(true);
        metrics.set_compressor_available(false);
        assert!(!metrics.snapshot().compressor_available);
        Ok(())
    }

    #[test]
    fn outcome_labels_are_stable() {
        assert_eq!(JobOutcome::Succeeded.as_str(), "succeeded");
        assert_eq!(JobOutcome::Rejected.as_str(), "rejected");
        assert_eq!(JobOutcome::Failed.as_str(), "failed");
    }
}
