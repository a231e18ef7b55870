use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::json;
use time::OffsetDateTime;
use tracing::warn;

use crate::error::AppError;
use crate::routes::envelope;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: String,
    token_store: &'static str,
    time: String,
}

/// 200 `ok` when the token store answers, otherwise 503 `degraded`.
///
/// The store error is logged, never returned.
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let app_version = env!("CARGO_PKG_VERSION").to_string();

    let now = OffsetDateTime::now_utc();
    let time = now
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    // A lookup of a token that can never exist exercises the backend.
    let store_up = match app_state.tokens.lookup("health-check").await {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "health check: token store unavailable");
            false
        }
    };

    let (status, code, token_store) = if store_up {
        ("ok", StatusCode::OK, "ok")
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE, "error")
    };

    let response = HealthResponse {
        status,
        app_version,
        token_store,
        time,
    };

    Ok(envelope::respond(code.as_u16(), json!(response)))
}

pub fn configure_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
