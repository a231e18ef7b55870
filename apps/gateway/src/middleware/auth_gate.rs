//! Authentication gate middleware.
//!
//! Runs once per request before any handler. Public paths pass through
//! untouched with no identity. Every other request must present a bearer
//! token that verifies and is live in the token store; otherwise the gate
//! answers 401 itself and the inner service is never called.
//!
//! On success the identity is inserted into request extensions (for the
//! `RequestIdentity` extractor) and scoped as the task-local identity for
//! the inner future (for outbound `X-User-Id` forwarding).

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::LocalBoxFuture;

use crate::auth::gate::authenticate;
use crate::error::AppError;
use crate::middleware::trace_span::record_owner;
use crate::request_ctx;
use crate::state::app_state::AppState;

#[derive(Clone, Copy, Default)]
pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                let err = AppError::internal("AppState not available");
                return Ok(req.error_response(err).map_into_right_body());
            };

            if state.public_paths.is_public(req.path()) {
                return service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body);
            }

            let path = req.path().to_string();
            let outcome =
                authenticate(&path, req.headers(), &state.codec, state.tokens.as_ref()).await;

            match outcome {
                Ok(identity) => {
                    record_owner(&identity.owner_id);
                    req.extensions_mut().insert(identity.clone());

                    let res = request_ctx::with_identity(identity, async move {
                        service.call(req).await
                    })
                    .await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}
