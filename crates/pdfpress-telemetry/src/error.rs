//! Error types for telemetry operations.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::string::FromUtf8Error;

use prometheus::Error as PrometheusError;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Step of the metrics lifecycle that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsStage {
    /// Constructing a collector from its options.
    Build,
    /// Adding a collector to the registry.
    Register,
    /// Encoding the registry into the text exposition format.
    Encode,
}

impl MetricsStage {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Register => "register",
            Self::Encode => "encode",
        }
    }
}

impl Display for MetricsStage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors raised while installing logging or maintaining metrics.
#[derive(Debug)]
pub enum TelemetryError {
    /// A global tracing subscriber was already installed.
    Subscriber {
        /// Underlying subscriber error.
        source: TryInitError,
    },
    /// The Prometheus registry rejected an operation.
    Metrics {
        /// Lifecycle step that failed.
        stage: MetricsStage,
        /// Metric name, when the failure concerns a single collector.
        metric: Option<&'static str>,
        /// Underlying Prometheus error.
        source: PrometheusError,
    },
    /// Encoded metrics were not UTF-8.
    Exposition {
        /// Underlying conversion error.
        source: FromUtf8Error,
    },
}

impl TelemetryError {
    pub(crate) const fn metrics(
        stage: MetricsStage,
        metric: Option<&'static str>,
        source: PrometheusError,
    ) -> Self {
        Self::Metrics {
            stage,
            metric,
            source,
        }
    }
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subscriber { .. } => formatter.write_str("tracing subscriber already installed"),
            Self::Metrics { stage, .. } => write!(formatter, "metrics {stage} failed"),
            Self::Exposition { .. } => formatter.write_str("metrics exposition is not utf-8"),
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Subscriber { source } => Some(source),
            Self::Metrics { source, .. } => Some(source),
            Self::Exposition { source } => Some(source),
        }
    }
}
