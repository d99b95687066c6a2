//! Default values and environment variable names for service configuration.
//!
//! # Design
//! - Keep every fallback in one place so the loader and docs stay in sync.
//! - Limits mirror what the browser front end historically enforced.

use std::net::{IpAddr, Ipv4Addr};

/// Listener address used when `PDFPRESS_BIND_ADDR` is unset.
pub const BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
/// Listener port used when `PDFPRESS_HTTP_PORT` is unset.
pub const HTTP_PORT: u16 = 8000;
/// Scratch directory used when `PDFPRESS_SCRATCH_DIR` is unset.
pub const SCRATCH_DIR: &str = "temp";
/// Compressor executable used when `PDFPRESS_COMPRESSOR_BIN` is unset.
pub const COMPRESSOR_BIN: &str = "gs";
/// Upper bound on a single compressor run, in seconds.
pub const COMPRESS_TIMEOUT_SECS: u64 = 300;
/// Request body limit applied to uploads (100 MiB).
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
/// Default tracing filter when neither `RUST_LOG` nor `PDFPRESS_LOG_LEVEL` is set.
pub const LOG_LEVEL: &str = "info";

pub(crate) const ENV_BIND_ADDR: &str = "PDFPRESS_BIND_ADDR";
pub(crate) const ENV_HTTP_PORT: &str = "PDFPRESS_HTTP_PORT";
pub(crate) const ENV_SCRATCH_DIR: &str = "PDFPRESS_SCRATCH_DIR";
pub(crate) const ENV_COMPRESSOR_BIN: &str = "PDFPRESS_COMPRESSOR_BIN";
pub(crate) const ENV_COMPRESS_TIMEOUT_SECS: &str = "PDFPRESS_COMPRESS_TIMEOUT_SECS";
pub(crate) const ENV_MAX_UPLOAD_BYTES: &str = "PDFPRESS_MAX_UPLOAD_BYTES";
pub(crate) const ENV_LOG_LEVEL: &str = "PDFPRESS_LOG_LEVEL";
pub(crate) const ENV_LOG_FORMAT: &str = "PDFPRESS_LOG_FORMAT";
