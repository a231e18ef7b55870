//! Outbound request interceptors.

use std::sync::Arc;

use reqwest::RequestBuilder;

use crate::request_ctx;

/// Header carrying the authenticated owner id to internal services.
pub const USER_ID_HEADER: &str = "X-User-Id";
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// A stage applied to every outbound request before it is sent.
pub trait OutboundInterceptor: Send + Sync {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Stamps the current request identity as `X-User-Id`.
///
/// Internal services trust this header without re-verifying the token; only
/// the gateway can reach them. With no identity in context (bypassed paths)
/// nothing is added.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityForwarding;

impl OutboundInterceptor for IdentityForwarding {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        match request_ctx::current_identity() {
            Some(identity) => request.header(USER_ID_HEADER, identity.owner_id),
            None => request,
        }
    }
}

/// Propagates the inbound trace id so downstream logs correlate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracePropagation;

impl OutboundInterceptor for TracePropagation {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        let trace_id = request_ctx::trace_id();
        if trace_id == "unknown" {
            return request;
        }
        request.header(TRACE_ID_HEADER, trace_id)
    }
}

pub fn default_interceptors() -> Arc<[Arc<dyn OutboundInterceptor>]> {
    Arc::from(vec![
        Arc::new(IdentityForwarding) as Arc<dyn OutboundInterceptor>,
        Arc::new(TracePropagation),
    ])
}
