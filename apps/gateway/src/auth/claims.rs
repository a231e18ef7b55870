//! Payload carried inside gateway-issued tokens.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque claims embedded in a token. Trusted only after verification.
pub type TokenClaims = Map<String, Value>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenPayload {
    /// Owner id of the authenticated member
    pub sub: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Unique per issued token, so same-second logins never collide
    pub jti: String,
    #[serde(default)]
    pub claims: TokenClaims,
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    pub owner_id: String,
    pub claims: TokenClaims,
}
