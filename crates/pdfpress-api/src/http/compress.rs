//! `POST /compress` upload endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{StatusCode, header},
    response::Response,
};
use pdfpress_api_models::{FIELD_FILE, FIELD_QUALITY, HEADER_COMPRESSED_SIZE, HEADER_ORIGINAL_SIZE};
use pdfpress_compress::{CompressRequest, CompressedPdf};
use tracing::{debug, error, warn};

use crate::http::constants::CONTENT_TYPE_PDF;
use crate::http::errors::ApiError;
use crate::state::ApiState;

#[derive(Default)]
struct UploadForm {
    file: Option<Upload>,
    quality: Option<String>,
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

pub(crate) async fn compress(
    State(state): State<Arc<ApiState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection, "compress request was not multipart");
        ApiError::bad_request("request body must be multipart/form-data")
    })?;
    let form = read_form(&mut multipart).await?;

    let Some(upload) = form.file else {
        return Err(missing_field(FIELD_FILE));
    };
    let Some(quality) = form.quality else {
        return Err(missing_field(FIELD_QUALITY));
    };

    let compressed = state
        .service
        .compress(CompressRequest {
            filename: &upload.filename,
            quality: &quality,
            bytes: &upload.bytes,
        })
        .await?;
    pdf_response(compressed)
}

async fn read_form(multipart: &mut Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some(FIELD_FILE) => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            Some(FIELD_QUALITY) => {
                form.quality = Some(field.text().await.map_err(multipart_error)?);
            }
            other => {
                debug!(field = ?other, "ignoring unexpected multipart field");
            }
        }
    }
    Ok(form)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!(error = %err.body_text(), "upload exceeded the body limit");
        return ApiError::payload_too_large("upload exceeds the configured size limit");
    }
    warn!(error = %err.body_text(), "failed to read multipart body");
    ApiError::bad_request("failed to read multipart body")
}

fn missing_field(field: &'static str) -> ApiError {
    ApiError::bad_request(format!("missing form field `{field}`"))
        .with_invalid_param(field, "field is required")
}

fn pdf_response(compressed: CompressedPdf) -> Result<Response, ApiError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, CONTENT_TYPE_PDF)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&compressed.filename),
        )
        .header(HEADER_ORIGINAL_SIZE, compressed.original_size)
        .header(HEADER_COMPRESSED_SIZE, compressed.compressed_size)
        .body(Body::from(compressed.bytes))
        .map_err(|err| {
            error!(error = %err, "failed to build compress response");
            ApiError::internal("failed to build compress response")
        })
}

/// `attachment` disposition for `filename`.
///
/// Names that are not plain printable ASCII get an ASCII fallback plus an
/// RFC 5987 `filename*` parameter carrying the UTF-8 name.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|ch| {
            if ch == ' ' || (ch.is_ascii_graphic() && ch != '"' && ch != '\\') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if fallback == filename {
        return format!("attachment; filename=\"{filename}\"");
    }
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}
