//! HTTP callers for the internal member, cart and product services.
//!
//! Every outbound call goes through [`ServiceClient`], which applies the
//! configured interceptors in order before sending. Failures surface
//! immediately; nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{redirect, Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::AppError;

pub mod cart;
pub mod interceptors;
pub mod member;
pub mod product;

pub use cart::CartClient;
pub use interceptors::{default_interceptors, IdentityForwarding, OutboundInterceptor, TracePropagation};
pub use member::MemberClient;
pub use product::ProductClient;

/// Status and decoded body of a successful downstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct DownstreamResponse {
    pub status: u16,
    /// `Value::Null` when the body was empty
    pub body: Value,
}

impl DownstreamResponse {
    /// The `content` field of a paged response, or `Null`.
    pub fn into_content(self) -> Value {
        match self.body {
            Value::Object(mut map) => map.remove("content").unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}

/// One internal service reachable at `base_url`.
#[derive(Clone)]
pub struct ServiceClient {
    service: &'static str,
    base_url: String,
    http: Client,
    interceptors: Arc<[Arc<dyn OutboundInterceptor>]>,
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

impl ServiceClient {
    pub fn new(
        service: &'static str,
        base_url: impl Into<String>,
        http: Client,
        interceptors: Arc<[Arc<dyn OutboundInterceptor>]>,
    ) -> Self {
        Self {
            service,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            interceptors,
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` with every interceptor applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.interceptors
            .iter()
            .fold(self.http.request(method, url), |req, interceptor| {
                interceptor.intercept(req)
            })
    }

    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<DownstreamResponse, AppError> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<DownstreamResponse, AppError> {
        self.send(self.request(Method::POST, path).query(query).json(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<DownstreamResponse, AppError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<DownstreamResponse, AppError> {
        let response = req.send().await.map_err(|e| AppError::DownstreamUnavailable {
            service: self.service,
            detail: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::DownstreamInvalidResponse {
                service: self.service,
                detail: format!("failed to read body: {e}"),
            })?;

        debug!(service = self.service, status, "downstream call completed");

        if !(200..300).contains(&status) {
            return Err(downstream_error(self.service, status, &bytes));
        }

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| AppError::DownstreamInvalidResponse {
                service: self.service,
                detail: format!("invalid JSON body: {e}"),
            })?
        };

        Ok(DownstreamResponse { status, body })
    }
}

/// Map a non-2xx downstream response to an error carrying its status.
///
/// The detail is the body's `message` field when present, otherwise the
/// status reason phrase.
pub fn downstream_error(service: &'static str, status: u16, body: &[u8]) -> AppError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.trim().is_empty());

    let detail = message.unwrap_or_else(|| {
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Downstream error")
            .to_string()
    });

    AppError::Downstream {
        service,
        status,
        detail,
    }
}

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Pooled client for internal calls.
///
/// Redirects are never followed: a followed redirect would carry
/// `X-User-Id` to whatever host the downstream names.
pub fn downstream_http_client() -> Result<Client, AppError> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(redirect::Policy::none())
        .build()
        .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))
}

/// The three downstream clients sharing one pooled HTTP client.
#[derive(Debug, Clone)]
pub struct Services {
    pub member: MemberClient,
    pub cart: CartClient,
    pub product: ProductClient,
}

impl Services {
    pub fn new(urls: &crate::config::ServiceUrls, http: Client) -> Self {
        let interceptors = default_interceptors();
        Self {
            member: MemberClient::new(ServiceClient::new(
                "member",
                urls.member.clone(),
                http.clone(),
                interceptors.clone(),
            )),
            cart: CartClient::new(ServiceClient::new(
                "cart",
                urls.cart.clone(),
                http.clone(),
                interceptors.clone(),
            )),
            product: ProductClient::new(ServiceClient::new(
                "product",
                urls.product.clone(),
                http,
                interceptors,
            )),
        }
    }
}
