//! Errors that stop the server process.
//!
//! Each variant names the boot step that failed and wraps the crate error
//! that caused it. Messages stay constant; the step lives in `operation`.

use thiserror::Error;

/// Result alias for the boot sequence.
pub type AppResult<T> = Result<T, AppError>;

/// Failure raised while booting or serving.
#[derive(Debug, Error)]
pub enum AppError {
    /// Environment configuration was rejected.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: pdfpress_config::ConfigError,
    },
    /// Logging or metrics could not be set up.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: pdfpress_telemetry::TelemetryError,
    },
    /// Compression service setup failed.
    #[error("compression setup failed")]
    Compress {
        /// Operation identifier.
        operation: &'static str,
        /// Source compression error.
        source: pdfpress_compress::CompressError,
    },
    /// The HTTP listener failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: pdfpress_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: pdfpress_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: pdfpress_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn compress(
        operation: &'static str,
        source: pdfpress_compress::CompressError,
    ) -> Self {
        Self::Compress { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: pdfpress_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "config.from_env",
            pdfpress_config::ConfigError::InvalidField {
                field: "PDFPRESS_HTTP_PORT",
                value: Some("0".to_string()),
                reason: "zero",
            },
        );
        assert!(matches!(config, AppError::Config { .. }));
        assert_eq!(config.to_string(), "configuration operation failed");
        assert!(config.source().is_some());

        let api = AppError::api_server(
            "api_server.serve",
            pdfpress_api::ApiServerError::Serve {
                source: io::Error::other("io"),
            },
        );
        assert!(matches!(api, AppError::ApiServer { .. }));

        let compress = AppError::compress(
            "scratch.prepare",
            pdfpress_compress::CompressError::Io {
                operation: "scratch.prepare",
                path: "/readonly/scratch".into(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            },
        );
        assert!(matches!(compress, AppError::Compress { .. }));
    }
}
