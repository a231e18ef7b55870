//! Per-request authentication decision.
//!
//! States: unchecked, then exactly one of header missing, signature
//! invalid, revoked or expired (all rejected with 401) or authenticated.

use actix_web::http::header::HeaderMap;

use crate::auth::token_codec::TokenCodec;
use crate::error::{AppError, AuthFailure};
use crate::extractors::bearer::parse_bearer;
use crate::extractors::identity::RequestIdentity;
use crate::logging::security;
use crate::token_store::TokenStore;

/// Authenticate one request from its headers.
///
/// Every rejection is logged with its internal reason and returned as an
/// `Unauthorized` error that renders identically on the wire. A token store
/// failure is not an authentication decision and surfaces as a 500.
pub async fn authenticate(
    path: &str,
    headers: &HeaderMap,
    codec: &TokenCodec,
    store: &dyn TokenStore,
) -> Result<RequestIdentity, AppError> {
    let token = parse_bearer(headers).map_err(|reason| reject(reason, path, None))?;

    let verified = codec
        .verify(&token)
        .map_err(|e| reject(e.into(), path, Some(&token)))?;

    let live = store.lookup(&token).await.map_err(AppError::from)?;
    match live {
        Some(record) if record.owner_id == verified.owner_id => {
            Ok(RequestIdentity::new(verified.owner_id))
        }
        _ => Err(reject(AuthFailure::Revoked, path, Some(&token))),
    }
}

fn reject(reason: AuthFailure, path: &str, token: Option<&str>) -> AppError {
    security::auth_rejected(reason, path, token);
    AppError::unauthorized(reason)
}
