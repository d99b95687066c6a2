//! Environment-backed configuration loader.
//!
//! # Design
//! - Every variable is optional; unset or blank values fall back to `defaults`.
//! - Lookup is injectable so tests never touch the process environment.

use tracing::debug;

use crate::defaults::{
    ENV_BIND_ADDR, ENV_COMPRESS_TIMEOUT_SECS, ENV_COMPRESSOR_BIN, ENV_HTTP_PORT, ENV_LOG_FORMAT,
    ENV_LOG_LEVEL, ENV_MAX_UPLOAD_BYTES, ENV_SCRATCH_DIR,
};
use crate::error::ConfigResult;
use crate::model::ServiceConfig;
use crate::validate::{
    parse_bytes, parse_ip, parse_log_format, parse_path, parse_port, parse_seconds,
};

/// Load the service configuration from process environment variables.
///
/// # Errors
///
/// Returns an error when any variable is present but invalid.
pub fn from_env() -> ConfigResult<ServiceConfig> {
    from_lookup(|name| std::env::var(name).ok())
}

/// Load the service configuration using the supplied variable lookup.
///
/// # Errors
///
/// Returns an error when any variable is present but invalid.
pub fn from_lookup<F>(lookup: F) -> ConfigResult<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &'static str| {
        lookup(name).filter(|value| {
            let present = !value.trim().is_empty();
            if !present {
                debug!(variable = name, "ignoring blank configuration value");
            }
            present
        })
    };

    let mut config = ServiceConfig::default();

    if let Some(raw) = read(ENV_BIND_ADDR) {
        config.bind_addr = parse_ip(ENV_BIND_ADDR, &raw)?;
    }
    if let Some(raw) = read(ENV_HTTP_PORT) {
        config.http_port = parse_port(ENV_HTTP_PORT, &raw)?;
    }
    if let Some(raw) = read(ENV_SCRATCH_DIR) {
        config.scratch_dir = parse_path(ENV_SCRATCH_DIR, &raw)?;
    }
    if let Some(raw) = read(ENV_COMPRESSOR_BIN) {
        config.compressor_bin = parse_path(ENV_COMPRESSOR_BIN, &raw)?;
    }
    if let Some(raw) = read(ENV_COMPRESS_TIMEOUT_SECS) {
        config.compress_timeout = parse_seconds(ENV_COMPRESS_TIMEOUT_SECS, &raw)?;
    }
    if let Some(raw) = read(ENV_MAX_UPLOAD_BYTES) {
        config.max_upload_bytes = parse_bytes(ENV_MAX_UPLOAD_BYTES, &raw)?;
    }
    if let Some(raw) = read(ENV_LOG_LEVEL) {
        config.log_level = raw.trim().to_string();
    }
    if let Some(raw) = read(ENV_LOG_FORMAT) {
        config.log_format = Some(parse_log_format(ENV_LOG_FORMAT, &raw)?);
    }

    Ok(config)
}
