use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::extractors::{RequestIdentity, Validate, ValidatedJson};
use crate::routes::envelope::{self, PageParams};
use crate::routes::path_segment;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AddToCartRequest {
    #[serde(rename = "productId", default)]
    pub product_id: String,
    #[serde(default)]
    pub qty: Option<i64>,
}

impl Validate for AddToCartRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.product_id.trim().is_empty() {
            return Err(AppError::invalid("productId", "must not be blank"));
        }
        match self.qty {
            None => Err(AppError::invalid("qty", "must not be null")),
            Some(qty) if qty < 1 => Err(AppError::invalid("qty", "must be at least 1")),
            Some(_) => Ok(()),
        }
    }
}

async fn add_to_cart(
    identity: RequestIdentity,
    body: ValidatedJson<AddToCartRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let response = app_state
        .services
        .cart
        .add_to_cart(&identity.owner_id, &json!(body.into_inner()))
        .await?;
    Ok(envelope::respond(response.status, response.body))
}

async fn get_cart(
    identity: RequestIdentity,
    params: web::Query<PageParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let response = app_state
        .services
        .cart
        .get_cart(&identity.owner_id, params.page, params.size)
        .await?;
    let status = response.status;
    Ok(envelope::respond(status, response.into_content()))
}

async fn delete_from_cart(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let item_id = path_segment("id", &path)?;
    let response = app_state.services.cart.delete_from_cart(item_id).await?;
    Ok(envelope::respond(
        response.status,
        json!({ "deleted": response.body }),
    ))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/addToCart", web::post().to(add_to_cart))
        .route("/getCart", web::get().to(get_cart))
        .route("/deleteFromCart/{id}", web::delete().to(delete_from_cart));
}
