use super::{DownstreamResponse, ServiceClient};
use crate::error::AppError;

/// Caller for the public product catalog.
#[derive(Debug, Clone)]
pub struct ProductClient {
    inner: ServiceClient,
}

impl ProductClient {
    pub fn new(inner: ServiceClient) -> Self {
        Self { inner }
    }

    pub async fn lists(&self, page: u32, size: u32) -> Result<DownstreamResponse, AppError> {
        self.inner
            .get(
                "/api/product/lists",
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await
    }

    pub async fn search(
        &self,
        product_name: &str,
        page: u32,
        size: u32,
    ) -> Result<DownstreamResponse, AppError> {
        self.inner
            .get(
                "/api/product/search",
                &[
                    ("productName", product_name.to_string()),
                    ("page", page.to_string()),
                    ("size", size.to_string()),
                ],
            )
            .await
    }

    /// `product_id` must already be a safe path segment.
    pub async fn detail(&self, product_id: &str) -> Result<DownstreamResponse, AppError> {
        self.inner
            .get(&format!("/api/product/product-detail/{product_id}"), &[])
            .await
    }
}
