//! Success envelope shared by every gateway endpoint.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// `{code, status, data, errors}`; `status` is the status name, e.g. `OK`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub code: u16,
    pub status: String,
    pub data: Value,
    pub errors: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, data: Value) -> Self {
        Self {
            code: status.as_u16(),
            status: status_name(status),
            data,
            errors: None,
        }
    }
}

/// `Not Found` -> `NOT_FOUND`.
pub fn status_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_uppercase()
        .replace([' ', '-'], "_")
}

/// Reply with `status` (a downstream status passes straight through).
pub fn respond(status: u16, data: Value) -> HttpResponse {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
    HttpResponse::build(status).json(ApiResponse::new(status, data))
}

pub fn ok(data: Value) -> HttpResponse {
    respond(StatusCode::OK.as_u16(), data)
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
