use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::auth::claims::TokenClaims;
use crate::error::AppError;
use crate::extractors::{BearerToken, Validate, ValidatedJson};
use crate::logging::security;
use crate::routes::envelope;
use crate::state::app_state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

/// Register and login body, forwarded to the member service unchanged.
#[derive(Debug, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for Credentials {
    fn validate(&self) -> Result<(), AppError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(AppError::invalid("email", "must not be blank"));
        }
        if !email.contains('@') {
            return Err(AppError::invalid("email", "must be a well-formed email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::invalid(
                "password",
                "Password must be at least 8 characters",
            ));
        }
        Ok(())
    }
}

/// Member id from a member-service login response: `userId`, else `id`.
fn owner_id_of(member: &Map<String, Value>) -> Option<String> {
    ["userId", "id"]
        .iter()
        .filter_map(|key| member.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

async fn register(
    body: ValidatedJson<Credentials>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let credentials = json!(body.into_inner());
    let response = app_state.services.member.register(&credentials).await?;
    Ok(envelope::respond(response.status, response.body))
}

/// Check credentials with the member service, then issue a token and record
/// it as live.
async fn login(
    body: ValidatedJson<Credentials>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let credentials = body.into_inner();

    let response = match app_state.services.member.login(&json!(credentials)).await {
        Ok(response) => response,
        Err(e) => {
            if let AppError::Downstream { status, .. } = &e {
                if (400..500).contains(status) {
                    security::login_failed("credentials_rejected", Some(&credentials.email));
                }
            }
            return Err(e);
        }
    };

    let Value::Object(member) = response.body else {
        return Err(AppError::DownstreamInvalidResponse {
            service: "member",
            detail: "login response is not an object".to_string(),
        });
    };

    let owner_id = owner_id_of(&member).ok_or_else(|| AppError::DownstreamInvalidResponse {
        service: "member",
        detail: "login response carries no member id".to_string(),
    })?;

    let ttl = app_state.security.token_ttl;
    let mut claims = TokenClaims::new();
    claims.insert("claims".to_string(), Value::Object(member.clone()));

    let token = app_state.codec.issue(&owner_id, claims, ttl)?;
    app_state.tokens.put(&token, &owner_id, ttl).await?;

    info!(owner_id = %owner_id, "login succeeded");

    Ok(envelope::ok(json!({
        "user": Value::Object(member),
        "token": token,
    })))
}

/// Revoke the presented token. The token must still verify.
async fn logout(
    bearer: BearerToken,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let verified = app_state.codec.verify(&bearer.token).map_err(|e| {
        security::auth_rejected(e.into(), "/auth/logout", Some(&bearer.token));
        AppError::from(e)
    })?;

    let revoked = app_state.tokens.revoke(&bearer.token).await?;
    info!(owner_id = %verified.owner_id, revoked, "logout");

    Ok(envelope::ok(json!({ "revoked": revoked })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout));
}
