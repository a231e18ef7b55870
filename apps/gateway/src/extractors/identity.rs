use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthFailure};

/// Authenticated owner of the current request.
///
/// Inserted into request extensions by the `AuthGate` middleware after the
/// bearer token verified and was found live in the token store. It is never
/// persisted and is dropped with the request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    pub owner_id: String,
}

impl RequestIdentity {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }
}

impl FromRequest for RequestIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // A handler asking for an identity on a bypassed path is anonymous.
        let identity = req
            .extensions()
            .get::<RequestIdentity>()
            .cloned()
            .ok_or(AppError::unauthorized(AuthFailure::HeaderMissing));
        ready(identity)
    }
}
