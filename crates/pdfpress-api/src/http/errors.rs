//! RFC9457-style API error wrapper.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdfpress_api_models::{FIELD_FILE, FIELD_QUALITY, ProblemDetails, ProblemInvalidParam};
use pdfpress_compress::CompressError;
use tracing::error;

use crate::http::constants::{
    PROBLEM_BAD_REQUEST, PROBLEM_COMPRESSION_FAILED, PROBLEM_INTERNAL, PROBLEM_PAYLOAD_TOO_LARGE,
};

pub(crate) const DETAIL_NOT_A_PDF: &str = "file must be a PDF";
pub(crate) const DETAIL_UNKNOWN_QUALITY: &str = "unknown quality level";
pub(crate) const DETAIL_COMPRESSION_FAILED: &str = "failed to compress PDF";

/// Structured API error with optional RFC9457 fields.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) kind: &'static str,
    title: &'static str,
    detail: Option<String>,
    pub(crate) invalid_params: Option<Vec<ProblemInvalidParam>>,
}

impl ApiError {
    const fn new(status: StatusCode, kind: &'static str, title: &'static str) -> Self {
        Self {
            status,
            kind,
            title,
            detail: None,
            invalid_params: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub(crate) fn with_invalid_param(mut self, field: &str, message: impl Into<String>) -> Self {
        self.invalid_params
            .get_or_insert_with(Vec::new)
            .push(ProblemInvalidParam {
                pointer: field.to_string(),
                message: message.into(),
            });
        self
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            PROBLEM_INTERNAL,
            "internal server error",
        )
        .with_detail(message)
    }

    pub(crate) fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, PROBLEM_BAD_REQUEST, "bad request").with_detail(detail)
    }

    pub(crate) fn payload_too_large(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            PROBLEM_PAYLOAD_TOO_LARGE,
            "payload too large",
        )
        .with_detail(detail)
    }

    pub(crate) fn compression_failed() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            PROBLEM_COMPRESSION_FAILED,
            "compression failed",
        )
        .with_detail(DETAIL_COMPRESSION_FAILED)
    }
}

impl From<CompressError> for ApiError {
    fn from(err: CompressError) -> Self {
        let message = err.to_string();
        match err {
            CompressError::InvalidInput { field, .. } if field == FIELD_FILE => {
                Self::bad_request(DETAIL_NOT_A_PDF).with_invalid_param(FIELD_FILE, DETAIL_NOT_A_PDF)
            }
            CompressError::InvalidInput { field, .. } if field == FIELD_QUALITY => {
                Self::bad_request(DETAIL_UNKNOWN_QUALITY)
                    .with_invalid_param(FIELD_QUALITY, "expected one of low, medium, high")
            }
            CompressError::InvalidInput { field, reason, .. } => {
                Self::bad_request("invalid request").with_invalid_param(field, reason)
            }
            CompressError::CompressionFailed { source } => {
                error!(error = %source, "compression request failed");
                Self::compression_failed()
            }
            CompressError::Io {
                operation,
                path,
                source,
            } => {
                error!(
                    operation,
                    path = %path.display(),
                    error = %source,
                    "compression request hit an io failure"
                );
                Self::internal(format!("{message}: {source}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            invalid_params: self.invalid_params,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfpress_compress::CompressorFailure;
    use std::io;

    #[test]
    fn invalid_file_maps_to_bad_request() {
        let err = ApiError::from(CompressError::InvalidInput {
            field: "file",
            reason: "not_a_pdf",
            value: Some("notes.txt".to_string()),
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.kind, PROBLEM_BAD_REQUEST);
        assert_eq!(err.detail.as_deref(), Some(DETAIL_NOT_A_PDF));
        assert_eq!(
            err.invalid_params.as_ref().map(|params| params[0].pointer.as_str()),
            Some("file")
        );
    }

    #[test]
    fn unknown_quality_maps_to_bad_request() {
        let err = ApiError::from(CompressError::InvalidInput {
            field: "quality",
            reason: "unknown_quality",
            value: Some("ultra".to_string()),
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail.as_deref(), Some(DETAIL_UNKNOWN_QUALITY));
    }

    #[test]
    fn tool_failure_hides_stderr() {
        let err = ApiError::from(CompressError::CompressionFailed {
            source: CompressorFailure::Exit {
                code: Some(1),
                stderr: "secret diagnostic".to_string(),
            },
        });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind, PROBLEM_COMPRESSION_FAILED);
        assert_eq!(err.detail.as_deref(), Some(DETAIL_COMPRESSION_FAILED));
    }

    #[test]
    fn io_failure_maps_to_internal_with_message() {
        let err = ApiError::from(CompressError::Io {
            operation: "scratch.write_input",
            path: "/scratch/x_input.pdf".into(),
            source: io::Error::new(io::ErrorKind::StorageFull, "disk full"),
        });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind, PROBLEM_INTERNAL);
        assert_eq!(
            err.detail.as_deref(),
            Some("compression io failure: disk full")
        );
        assert!(
            !err.detail.as_deref().unwrap_or_default().contains("/scratch"),
            "scratch paths stay in logs"
        );
    }

    #[test]
    fn into_response_sets_status() {
        let response = ApiError::payload_too_large("too big").into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
