//! Task-local request context.
//!
//! Two values live here for the duration of one inbound request:
//! - the trace id, established by `RequestTrace` for every request;
//! - the authenticated identity, established by `AuthGate` only after a
//!   token passed every check.
//!
//! Outbound interceptors read both without the handler having to thread
//! them through every downstream call.

use tokio::task_local;

use crate::extractors::identity::RequestIdentity;

task_local! {
    static TRACE_ID: String;
    static IDENTITY: RequestIdentity;
}

/// Trace id of the current request, or "unknown" outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run a future with `trace_id` visible to [`trace_id`].
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}

/// Identity established for the current request, if any.
///
/// `None` on bypassed paths and outside a request.
pub fn current_identity() -> Option<RequestIdentity> {
    IDENTITY.try_with(Clone::clone).ok()
}

/// Run a future with `identity` as the current request identity.
pub async fn with_identity<F, R>(identity: RequestIdentity, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    IDENTITY.scope(identity, future).await
}
