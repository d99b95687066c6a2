//! Shared HTTP constants (headers, problem URIs, content types).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const CONTENT_TYPE_PDF: &str = "application/pdf";
pub(crate) const CONTENT_TYPE_METRICS: &str = "text/plain; version=0.0.4";

pub(crate) const PROBLEM_INTERNAL: &str = "https://pdfpress.dev/problems/internal";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://pdfpress.dev/problems/bad-request";
pub(crate) const PROBLEM_COMPRESSION_FAILED: &str =
    "https://pdfpress.dev/problems/compression-failed";
pub(crate) const PROBLEM_PAYLOAD_TOO_LARGE: &str =
    "https://pdfpress.dev/problems/payload-too-large";
