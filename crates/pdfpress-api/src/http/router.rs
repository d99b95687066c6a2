//! Router construction and server host for the API.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{DefaultBodyLimit, MatchedPath},
    http::{Method, Request, header::CONTENT_TYPE},
    routing::{get, post},
};
use pdfpress_compress::CompressionService;
use pdfpress_telemetry::build_sha;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Span, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::compress::compress;
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::health::{health, metrics};
use crate::http::telemetry::RequestScopeLayer;
use crate::state::ApiState;

/// Axum router wrapper that hosts the pdfpress API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Build the router around a compression service.
    ///
    /// `max_upload_bytes` caps the request body accepted by `POST /compress`.
    #[must_use]
    pub fn new(service: CompressionService, max_upload_bytes: usize) -> Self {
        let telemetry = service.metrics().clone();
        let state = Arc::new(ApiState::new(service, telemetry.clone()));

        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let route = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map_or_else(|| request.uri().path(), MatchedPath::as_str)
                    .to_string();
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %route,
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(pdfpress_telemetry::propagate_request_id_layer())
            .layer(pdfpress_telemetry::set_request_id_layer())
            .layer(trace_layer)
            .layer(RequestScopeLayer::new(telemetry));

        let router = Router::new()
            .route("/compress", post(compress))
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route_layer(layered)
            .layer(DefaultBodyLimit::max(max_upload_bytes))
            .layer(cors_layer)
            .with_state(state);

        Self { router }
    }

    /// Bind `addr` and serve until `shutdown` resolves.
    ///
    /// In-flight requests are allowed to finish after the signal fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> ApiServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        info!(addr = %addr, "starting API");
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| ApiServerError::Serve { source })?;
        info!("API stopped");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn router(&self) -> Router {
        self.router.clone()
    }
}
