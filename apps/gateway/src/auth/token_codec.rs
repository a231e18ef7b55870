use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::claims::{TokenClaims, TokenPayload, VerifiedToken};
use crate::error::{AppError, AuthFailure};
use crate::state::security_config::{SecurityConfig, MAX_TOKEN_TTL};

/// Reasons a presented token is not trusted.
///
/// Callers reject all of them the same way; the distinction exists for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token could not be parsed")]
    Malformed,
}

impl From<VerifyError> for AuthFailure {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::InvalidSignature => AuthFailure::SignatureInvalid,
            VerifyError::Expired => AuthFailure::Expired,
            VerifyError::Malformed => AuthFailure::Malformed,
        }
    }
}

impl From<VerifyError> for AppError {
    fn from(e: VerifyError) -> Self {
        AppError::unauthorized(e.into())
    }
}

/// Signs and verifies compact HS256 tokens.
///
/// Stateless apart from the keys derived from [`SecurityConfig`] at
/// construction.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(security: &SecurityConfig) -> Self {
        // Pin the algorithm and check expiry to the second.
        let mut validation = Validation::new(security.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            algorithm: security.algorithm,
            encoding_key: EncodingKey::from_secret(&security.jwt_secret),
            decoding_key: DecodingKey::from_secret(&security.jwt_secret),
            validation,
        }
    }

    /// Issue a token for `owner_id` valid for `ttl` from now.
    pub fn issue(
        &self,
        owner_id: &str,
        claims: TokenClaims,
        ttl: Duration,
    ) -> Result<String, AppError> {
        self.issue_at(owner_id, claims, ttl, SystemTime::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// Sub-second TTLs round up so expiry is always strictly after issue.
    /// Every token carries a fresh `jti`, so no two issued tokens are equal.
    pub fn issue_at(
        &self,
        owner_id: &str,
        claims: TokenClaims,
        ttl: Duration,
        now: SystemTime,
    ) -> Result<String, AppError> {
        if ttl > MAX_TOKEN_TTL {
            return Err(AppError::internal(format!(
                "token ttl of {}s exceeds the maximum of {}s",
                ttl.as_secs(),
                MAX_TOKEN_TTL.as_secs()
            )));
        }

        let iat = now
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|d| i64::try_from(d.as_secs()).ok())
            .ok_or_else(|| AppError::internal("Failed to get current time"))?;

        let ttl_secs = (ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0)).max(1);
        let exp = i64::try_from(ttl_secs)
            .ok()
            .and_then(|secs| iat.checked_add(secs))
            .ok_or_else(|| AppError::internal("token expiry out of range"))?;

        let payload = TokenPayload {
            sub: owner_id.to_string(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
            claims,
        };

        encode(&Header::new(self.algorithm), &payload, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
    }

    /// Verify signature and expiry, returning the owner and claims.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, VerifyError> {
        decode::<TokenPayload>(token, &self.decoding_key, &self.validation)
            .map(|data| VerifiedToken {
                owner_id: data.claims.sub,
                claims: data.claims.claims,
            })
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    VerifyError::InvalidSignature
                }
                _ => VerifyError::Malformed,
            })
    }
}
