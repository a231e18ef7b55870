use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::AppError;
use crate::extractors::RequestIdentity;
use crate::routes::envelope::{self, PageParams};
use crate::state::app_state::AppState;

async fn current_user(identity: RequestIdentity) -> Result<HttpResponse, AppError> {
    Ok(envelope::ok(json!({ "userId": identity.owner_id })))
}

async fn users(
    params: web::Query<PageParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let response = app_state
        .services
        .member
        .users(params.page, params.size)
        .await?;
    let status = response.status;
    Ok(envelope::respond(status, response.into_content()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/currentUser", web::get().to(current_user))
        .route("/users", web::get().to(users));
}
