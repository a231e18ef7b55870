use serde_json::Value;

use super::{DownstreamResponse, ServiceClient};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct CartClient {
    inner: ServiceClient,
}

impl CartClient {
    pub fn new(inner: ServiceClient) -> Self {
        Self { inner }
    }

    pub async fn add_to_cart(
        &self,
        member_id: &str,
        body: &Value,
    ) -> Result<DownstreamResponse, AppError> {
        self.inner
            .post_json(
                "/api/cart/addToCart",
                &[("memberId", member_id.to_string())],
                body,
            )
            .await
    }

    pub async fn get_cart(
        &self,
        member_id: &str,
        page: u32,
        size: u32,
    ) -> Result<DownstreamResponse, AppError> {
        self.inner
            .get(
                "/api/cart/getCart",
                &[
                    ("memberId", member_id.to_string()),
                    ("page", page.to_string()),
                    ("size", size.to_string()),
                ],
            )
            .await
    }

    /// `item_id` must already be a safe path segment.
    pub async fn delete_from_cart(&self, item_id: &str) -> Result<DownstreamResponse, AppError> {
        self.inner
            .delete(&format!("/api/cart/deleteFromCart/{item_id}"))
            .await
    }
}
