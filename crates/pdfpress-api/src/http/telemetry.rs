//! Request-scoped middleware: request context for logs plus per-route counters.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::extract::MatchedPath;
use axum::http::Request;
use axum::response::Response;
use pdfpress_telemetry::{Metrics, with_request_context};
use tower::{Layer, Service};

use crate::http::constants::HEADER_REQUEST_ID;

type ScopedFuture<E> = Pin<Box<dyn Future<Output = Result<Response, E>> + Send>>;

/// Runs each request inside a telemetry scope.
///
/// Handlers see the request id through `pdfpress_telemetry::current_request_id`,
/// and every completed response bumps `http_requests_total{route,status}`.
#[derive(Clone)]
pub(crate) struct RequestScopeLayer {
    metrics: Metrics,
}

impl RequestScopeLayer {
    pub(crate) const fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for RequestScopeLayer {
    type Service = RequestScope<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestScope {
            inner,
            metrics: self.metrics.clone(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct RequestScope<S> {
    inner: S,
    metrics: Metrics,
}

/// Route template (or raw path when unmatched) and inbound request id.
fn scope_labels<B>(req: &Request<B>) -> (String, String) {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or(req.uri().path(), MatchedPath::as_str)
        .to_owned();
    let request_id = req
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    (route, request_id)
}

impl<S, B> Service<Request<B>> for RequestScope<S>
where
    S: Service<Request<B>, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
    B: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = ScopedFuture<S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let (route, request_id) = scope_labels(&req);
        let metrics = self.metrics.clone();
        let pending = self.inner.call(req);

        Box::pin(with_request_context(request_id, async move {
            let response = pending.await?;
            metrics.inc_http_request(&route, response.status().as_u16());
            Ok(response)
        }))
    }
}
