use actix_web::dev::Payload;
use actix_web::http::header::{self, HeaderMap};
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::{AppError, AuthFailure};

/// Raw bearer token taken from the `Authorization` header.
///
/// Carries no verification; used by the gate and by endpoints on bypassed
/// paths that still need the caller's token (logout).
#[derive(Debug, Clone)]
pub struct BearerToken {
    pub token: String,
}

/// Parse `Authorization: Bearer <token>`.
///
/// Absence → `HeaderMissing`; anything other than exactly the `Bearer`
/// scheme followed by a non-empty token → `SchemeInvalid`.
pub fn parse_bearer(headers: &HeaderMap) -> Result<String, AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::HeaderMissing)?;

    let value = value.to_str().map_err(|_| AuthFailure::SchemeInvalid)?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok((*token).to_string()),
        _ => Err(AuthFailure::SchemeInvalid),
    }
}

impl FromRequest for BearerToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            parse_bearer(req.headers())
                .map(|token| BearerToken { token })
                .map_err(AppError::unauthorized),
        )
    }
}
