//! Typed configuration model.
//!
//! # Design
//! - Pure data carrier built once by the loader and shared read-only afterwards.
//! - Keeps environment parsing out of the model so tests can build it directly.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::defaults;

/// Effective process configuration for the compression service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// IP address the HTTP listener binds to.
    pub bind_addr: IpAddr,
    /// Port the HTTP listener binds to.
    pub http_port: u16,
    /// Directory holding per-job scratch files.
    pub scratch_dir: PathBuf,
    /// Executable invoked to compress documents.
    pub compressor_bin: PathBuf,
    /// Maximum time a single compressor run may take.
    pub compress_timeout: Duration,
    /// Request body limit applied to uploads.
    pub max_upload_bytes: usize,
    /// Default tracing filter directive.
    pub log_level: String,
    /// Explicit log format, or `None` to infer from the build profile.
    pub log_format: Option<LogFormatPreference>,
}

impl ServiceConfig {
    /// Socket address for the HTTP listener.
    #[must_use]
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: defaults::BIND_ADDR,
            http_port: defaults::HTTP_PORT,
            scratch_dir: PathBuf::from(defaults::SCRATCH_DIR),
            compressor_bin: PathBuf::from(defaults::COMPRESSOR_BIN),
            compress_timeout: Duration::from_secs(defaults::COMPRESS_TIMEOUT_SECS),
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
            log_level: defaults::LOG_LEVEL.to_string(),
            log_format: None,
        }
    }
}

/// Requested log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatPreference {
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

impl FromStr for LogFormatPreference {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(()),
        }
    }
}
