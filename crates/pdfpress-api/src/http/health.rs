//! Health and metrics endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use pdfpress_api_models::HealthResponse;
use tracing::{debug, error};

use crate::http::constants::CONTENT_TYPE_METRICS;
use crate::http::errors::ApiError;
use crate::state::ApiState;

/// Liveness plus Ghostscript availability; always 200 while the process serves.
pub(crate) async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let status = state.service.check_health().await;
    if !status.compressor_available {
        debug!("health check could not invoke ghostscript");
    }
    Json(HealthResponse {
        status: "ok".to_string(),
        ghostscript_available: status.compressor_available,
    })
}

/// Prometheus text exposition of the shared registry.
pub(crate) async fn metrics(
    State(state): State<Arc<ApiState>>,
) -> Result<impl IntoResponse, ApiError> {
    let body = state.telemetry.render().map_err(|err| {
        error!(error = %err, "failed to render metrics");
        ApiError::internal("failed to render metrics")
    })?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE_METRICS)], body))
}
