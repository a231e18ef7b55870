//! Token helpers for tests

use std::time::{Duration, SystemTime};

use actix_web::http::header;
use gateway::auth::claims::TokenClaims;
use gateway::state::app_state::AppState;
use gateway::state::security_config::SecurityConfig;
use serde_json::json;

pub const TEST_SECRET: &str = "integration_test_secret_0123456789abcdef";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET.as_bytes()).with_token_ttl(Duration::from_secs(300))
}

fn member_claims(owner_id: &str) -> TokenClaims {
    let mut claims = TokenClaims::new();
    claims.insert("claims".to_string(), json!({ "id": owner_id }));
    claims
}

/// Issue a token for `owner_id` and record it as live, as login does.
pub async fn live_token(state: &AppState, owner_id: &str) -> String {
    let ttl = state.security.token_ttl;
    let token = state
        .codec
        .issue(owner_id, member_claims(owner_id), ttl)
        .expect("should issue token");
    state
        .tokens
        .put(&token, owner_id, ttl)
        .await
        .expect("should store token");
    token
}

/// A correctly signed token that was never recorded in the store.
pub fn unstored_token(state: &AppState, owner_id: &str) -> String {
    state
        .codec
        .issue(owner_id, member_claims(owner_id), state.security.token_ttl)
        .expect("should issue token")
}

/// A stored token whose embedded expiry has already passed.
pub async fn expired_token(state: &AppState, owner_id: &str) -> String {
    let issued = SystemTime::now() - Duration::from_secs(7200);
    let token = state
        .codec
        .issue_at(owner_id, member_claims(owner_id), Duration::from_secs(60), issued)
        .expect("should issue expired token");
    state
        .tokens
        .put(&token, owner_id, state.security.token_ttl)
        .await
        .expect("should store token");
    token
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}
