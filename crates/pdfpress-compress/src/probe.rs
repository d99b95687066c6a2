//! Compressor availability check backing the health endpoint.

use tracing::debug;

use crate::compressor::Compressor;

/// Result of probing the external compressor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    /// Whether `--version` ran and exited successfully.
    pub compressor_available: bool,
    /// Version string reported by the tool, when available.
    pub version: Option<String>,
}

/// Probe the compressor. Never fails; an absent tool reports unavailable.
pub async fn check_health(compressor: &dyn Compressor) -> HealthStatus {
    let version = compressor.probe().await;
    debug!(available = version.is_some(), "compressor health checked");
    HealthStatus {
        compressor_available: version.is_some(),
        version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compressor::{CompressorFailure, GhostscriptCompressor};
    use crate::quality::QualityProfile;
    use async_trait::async_trait;
    use std::path::Path;
    use std::time::Duration;

    struct Fixed(Option<&'static str>);

    #[async_trait]
    impl Compressor for Fixed {
        async fn compress(
            &self,
            _input: &Path,
            _output: &Path,
            _profile: QualityProfile,
        ) -> Result<(), CompressorFailure> {
            Ok(())
        }

        async fn probe(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[tokio::test]
    async fn available_tool_reports_version() {
        let status = check_health(&Fixed(Some("10.02.1"))).await;
        assert!(status.compressor_available);
        assert_eq!(status.version.as_deref(), Some("10.02.1"));
    }

    #[tokio::test]
    async fn missing_tool_reports_unavailable_without_failing() {
        let compressor =
            GhostscriptCompressor::new("/nonexistent/pdfpress-gs", Duration::from_secs(1));
        let status = check_health(&compressor).await;
        assert_eq!(
            status,
            HealthStatus {
                compressor_available: false,
                version: None,
            }
        );
    }
}
