//! Task-local request context and the process-wide service span.
//!
//! # Design
//! - The HTTP middleware opens a request scope; compression code reads the
//!   request id from it without threading the value through every call.
//! - A blank inbound id is stored as absent.

use std::future::Future;
use std::sync::Arc;

use tracing::span::EnteredSpan;

use crate::init::build_sha;

/// Keeps the `service` span entered until dropped, so every event logged by
/// the process carries the service name and build SHA.
pub struct GlobalContextGuard {
    _span: EnteredSpan,
}

impl GlobalContextGuard {
    /// Enter the `service` span for `service`.
    #[must_use]
    pub fn new(service: &str) -> Self {
        let span = tracing::info_span!("service", service, build_sha = %build_sha());
        Self {
            _span: span.entered(),
        }
    }
}

#[derive(Clone)]
struct RequestScope {
    request_id: Option<Arc<str>>,
}

tokio::task_local! {
    static REQUEST_SCOPE: RequestScope;
}

/// Request id of the request currently being served, if any.
#[must_use]
pub fn current_request_id() -> Option<String> {
    REQUEST_SCOPE
        .try_with(|scope| scope.request_id.as_deref().map(str::to_owned))
        .ok()
        .flatten()
}

/// Drive `fut` with `request_id` visible to [`current_request_id`].
pub async fn with_request_context<Fut, T>(request_id: impl Into<String>, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    let request_id = request_id.into();
    let scope = RequestScope {
        request_id: (!request_id.is_empty()).then(|| Arc::from(request_id)),
    };
    REQUEST_SCOPE.scope(scope, fut).await
}
