//! Boot sequence for the pdfpress service.
//!
//! # Design
//! - Configuration and the scratch directory are settled before the listener binds.
//! - Logging is installed only by the binary entrypoint; the injectable boot
//!   sequence can run repeatedly in tests.
//! - A missing compressor is reported at startup but does not prevent serving,
//!   so `/health` can surface it.

use std::future::Future;
use std::sync::Arc;

use pdfpress_api::ApiServer;
use pdfpress_compress::{CompressionService, Compressor, GhostscriptCompressor, ScratchDir};
use pdfpress_config::{LogFormatPreference, ServiceConfig};
use pdfpress_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, Metrics};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Dependencies required to bootstrap the pdfpress service.
pub(crate) struct BootstrapDependencies {
    config: ServiceConfig,
    telemetry: Metrics,
    compressor: Arc<dyn Compressor>,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment for the binary entrypoint.
    pub(crate) fn from_env() -> AppResult<Self> {
        let config =
            pdfpress_config::from_env().map_err(|err| AppError::config("config.from_env", err))?;
        Self::from_config(config)
    }

    /// Construct dependencies around an already loaded configuration.
    pub(crate) fn from_config(config: ServiceConfig) -> AppResult<Self> {
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        let compressor = Arc::new(GhostscriptCompressor::new(
            config.compressor_bin.clone(),
            config.compress_timeout,
        ));
        Ok(Self {
            config,
            telemetry,
            compressor,
        })
    }
}

/// Entry point for the pdfpress boot sequence.
///
/// # Errors
///
/// Returns an error if configuration is invalid, logging cannot be installed,
/// the scratch directory cannot be created, or the listener fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    pdfpress_telemetry::init_logging(&logging_config(&dependencies.config))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    run_app_with(dependencies, shutdown_signal()).await
}

/// Boot sequence that relies entirely on injected dependencies to simplify testing.
pub(crate) async fn run_app_with<F>(dependencies: BootstrapDependencies, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let _context = GlobalContextGuard::new("pdfpress");
    let BootstrapDependencies {
        config,
        telemetry,
        compressor,
    } = dependencies;

    info!(
        scratch_dir = %config.scratch_dir.display(),
        compressor = %config.compressor_bin.display(),
        timeout_secs = config.compress_timeout.as_secs(),
        max_upload_bytes = config.max_upload_bytes,
        "pdfpress bootstrap starting"
    );

    let scratch = ScratchDir::prepare(&config.scratch_dir)
        .map_err(|err| AppError::compress("scratch.prepare", err))?;
    let service = CompressionService::new(scratch, compressor, telemetry);

    let health = service.check_health().await;
    match health.version.as_deref() {
        Some(version) => info!(version, "ghostscript available"),
        None => warn!(
            compressor = %config.compressor_bin.display(),
            "ghostscript is not available; compression requests will fail"
        ),
    }

    let api = ApiServer::new(service, config.max_upload_bytes);
    api.serve(config.listen_addr(), shutdown)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn logging_config(config: &ServiceConfig) -> LoggingConfig<'_> {
    let defaults = LoggingConfig::default();
    LoggingConfig {
        level: &config.log_level,
        format: config.log_format.map_or(defaults.format, log_format),
        build_sha: defaults.build_sha,
    }
}

const fn log_format(preference: LogFormatPreference) -> LogFormat {
    match preference {
        LogFormatPreference::Json => LogFormat::Json,
        LogFormatPreference::Pretty => LogFormat::Pretty,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c"),
        () = terminate => info!("received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    fn test_config(scratch: &std::path::Path) -> ServiceConfig {
        ServiceConfig {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            http_port: 0,
            scratch_dir: scratch.to_path_buf(),
            compressor_bin: "/nonexistent/pdfpress-gs".into(),
            compress_timeout: Duration::from_secs(1),
            ..ServiceConfig::default()
        }
    }

    #[test]
    fn logging_config_follows_preference() {
        let mut config = ServiceConfig {
            log_level: "debug".to_string(),
            log_format: Some(LogFormatPreference::Json),
            ..ServiceConfig::default()
        };
        let logging = logging_config(&config);
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);

        config.log_format = None;
        assert_eq!(logging_config(&config).format, LogFormat::infer());
    }

    #[tokio::test]
    async fn boot_prepares_scratch_and_stops_on_signal() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let scratch = temp.path().join("scratch");
        let dependencies = BootstrapDependencies::from_config(test_config(&scratch))?;
        let telemetry = dependencies.telemetry.clone();

        tokio::time::timeout(
            Duration::from_secs(10),
            run_app_with(dependencies, async {}),
        )
        .await??;

        assert!(scratch.is_dir());
        assert!(!telemetry.snapshot().compressor_available);
        Ok(())
    }

    #[tokio::test]
    async fn unusable_scratch_dir_fails_boot() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let occupied = temp.path().join("occupied");
        std::fs::write(&occupied, b"x")?;
        let dependencies = BootstrapDependencies::from_config(test_config(&occupied))?;
        let result = run_app_with(dependencies, async {}).await;
        assert!(matches!(
            result,
            Err(AppError::Compress {
                operation: "scratch.prepare",
                ..
            })
        ));
        Ok(())
    }
}
