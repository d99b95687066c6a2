//! # Design
//!
//! - Provide structured, constant-message errors for the compression pipeline.
//! - Keep validation failures distinct from tool failures so callers can map
//!   them to client and server errors respectively.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::compressor::CompressorFailure;

/// Result type for compression operations.
pub type CompressResult<T> = Result<T, CompressError>;

/// Errors produced while handling a compression request.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The request was rejected before any file was written.
    #[error("invalid compression input")]
    InvalidInput {
        /// Request field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// The external compressor did not produce a usable document.
    #[error("pdf compression failed")]
    CompressionFailed {
        /// Underlying tool failure.
        #[source]
        source: CompressorFailure,
    },
    /// Scratch file IO failed.
    #[error("compression io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl CompressError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str, value: &str) -> Self {
        Self::InvalidInput {
            field,
            reason,
            value: Some(value.to_string()),
        }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn failed(source: CompressorFailure) -> Self {
        Self::CompressionFailed { source }
    }
}
