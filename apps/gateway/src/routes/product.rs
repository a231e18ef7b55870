use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::routes::envelope::{self, PageParams, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::routes::path_segment;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "productName", default = "default_product_name")]
    pub product_name: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_product_name() -> String {
    "string".to_string()
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

async fn lists(
    params: web::Query<PageParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let response = app_state
        .services
        .product
        .lists(params.page, params.size)
        .await?;
    let status = response.status;
    Ok(envelope::respond(status, response.into_content()))
}

async fn search(
    params: web::Query<SearchParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let response = app_state
        .services
        .product
        .search(&params.product_name, params.page, params.size)
        .await?;
    let status = response.status;
    Ok(envelope::respond(status, response.into_content()))
}

async fn detail(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let product_id = path_segment("id", &path)?;
    let response = app_state.services.product.detail(product_id).await?;
    Ok(envelope::respond(response.status, response.body))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/lists", web::get().to(lists))
        .route("/search", web::get().to(search))
        .route("/product-detail/{id}", web::get().to(detail));
}
