#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the pdfpress public API.
//!
//! These types are re-used by the CLI for request/response decoding so both
//! sides agree on field names, header names, and problem documents.

use serde::{Deserialize, Serialize};

/// Multipart field carrying the uploaded document.
pub const FIELD_FILE: &str = "file";
/// Multipart field carrying the quality label.
pub const FIELD_QUALITY: &str = "quality";
/// Response header with the uploaded document size in bytes.
pub const HEADER_ORIGINAL_SIZE: &str = "x-original-size";
/// Response header with the compressed document size in bytes.
pub const HEADER_COMPRESSED_SIZE: &str = "x-compressed-size";
/// Quality labels accepted by `POST /compress`, lowest quality first.
pub const QUALITY_LABELS: [&str; 3] = ["low", "medium", "high"];

/// RFC9457-compatible problem document surfaced on validation/runtime errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    /// URI reference identifying the problem type.
    pub kind: String,
    /// Short, human-readable summary of the issue.
    pub title: String,
    /// HTTP status code associated with the error.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Detailed diagnostic message when available.
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Parameters that failed validation, if applicable.
    pub invalid_params: Option<Vec<ProblemInvalidParam>>,
}

/// Invalid parameter pointer surfaced alongside a [`ProblemDetails`] payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemInvalidParam {
    /// Name of the offending form field.
    pub pointer: String,
    /// Human-readable description of the validation failure.
    pub message: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// Always `ok` while the service answers.
    pub status: String,
    /// Whether the Ghostscript binary answered `--version`.
    pub ghostscript_available: bool,
}
