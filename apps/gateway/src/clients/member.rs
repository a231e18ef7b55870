use serde_json::Value;

use super::{DownstreamResponse, ServiceClient};
use crate::error::AppError;

/// Caller for the member service (registration, login, user listing).
#[derive(Debug, Clone)]
pub struct MemberClient {
    inner: ServiceClient,
}

impl MemberClient {
    pub fn new(inner: ServiceClient) -> Self {
        Self { inner }
    }

    pub async fn register(&self, body: &Value) -> Result<DownstreamResponse, AppError> {
        self.inner.post_json("/api/auth/register", &[], body).await
    }

    /// Check credentials. The response body describes the member.
    pub async fn login(&self, body: &Value) -> Result<DownstreamResponse, AppError> {
        self.inner.post_json("/api/auth/login", &[], body).await
    }

    pub async fn users(&self, page: u32, size: u32) -> Result<DownstreamResponse, AppError> {
        self.inner
            .get(
                "/api/member/users",
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await
    }
}
