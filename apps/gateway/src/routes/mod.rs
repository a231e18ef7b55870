use actix_web::web;

use crate::error::AppError;

pub mod auth;
pub mod cart;
pub mod envelope;
pub mod health;
pub mod member;
pub mod product;

/// Register every gateway route.
///
/// Authentication is not applied here; `AuthGate` wraps the whole app and
/// decides per path.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let detail = format!("Invalid query parameters: {err}");
        AppError::bad_request(detail).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        let detail = format!("Invalid path parameters: {err}");
        AppError::bad_request(detail).into()
    }));

    // Health check routes: /health
    cfg.configure(health::configure_routes);

    // Auth routes: /auth/**
    cfg.service(web::scope("/auth").configure(auth::configure_routes));

    // Member routes: /member/**
    cfg.service(web::scope("/member").configure(member::configure_routes));

    // Cart routes: /cart/**
    cfg.service(web::scope("/cart").configure(cart::configure_routes));

    // Product routes: /product/**
    cfg.service(web::scope("/product").configure(product::configure_routes));
}

/// Accept `raw` as a single URL path segment for a downstream call.
pub fn path_segment<'a>(field: &str, raw: &'a str) -> Result<&'a str, AppError> {
    let valid = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && raw != "."
        && raw != "..";
    if valid {
        Ok(raw)
    } else {
        Err(AppError::invalid(field, "must be a plain identifier"))
    }
}
