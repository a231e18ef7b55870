//! Allow-list of currently valid tokens.
//!
//! A token that verifies cryptographically is still rejected unless it is
//! live here, which is what makes server-side revocation possible.
//! Expiry is passive: `lookup` treats records at or past `expires_at` as
//! absent whether or not a sweep has removed them yet.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::security_config::MAX_TOKEN_TTL;

pub mod memory;
pub mod sea;
pub mod sweeper;

pub use memory::MemoryTokenStore;
pub use sea::SeaTokenStore;
pub use sweeper::spawn_sweeper;

/// One issued token, owned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub id: Uuid,
    pub token: String,
    pub owner_id: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl TokenRecord {
    pub fn new(
        token: &str,
        owner_id: &str,
        ttl: Duration,
        now: OffsetDateTime,
    ) -> Result<Self, TokenStoreError> {
        if ttl.is_zero() || ttl > MAX_TOKEN_TTL {
            return Err(TokenStoreError::InvalidTtl);
        }
        let expires_at = time::Duration::try_from(ttl)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or(TokenStoreError::InvalidTtl)?;

        Ok(Self {
            id: Uuid::new_v4(),
            token: token.to_string(),
            owner_id: owner_id.to_string(),
            created_at: now,
            expires_at,
        })
    }

    pub fn is_live_at(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token ttl must be greater than zero and at most one year")]
    InvalidTtl,
    #[error("token store backend error: {0}")]
    Backend(String),
}

impl From<sea_orm::DbErr> for TokenStoreError {
    fn from(e: sea_orm::DbErr) -> Self {
        TokenStoreError::Backend(e.to_string())
    }
}

impl From<TokenStoreError> for AppError {
    fn from(e: TokenStoreError) -> Self {
        match e {
            TokenStoreError::InvalidTtl => AppError::internal(e.to_string()),
            TokenStoreError::Backend(detail) => AppError::TokenStore { detail },
        }
    }
}

/// Storage contract for live tokens.
///
/// Implementations must allow concurrent `put`/`lookup` on different keys
/// without an application-level lock.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Record `token` for `owner_id`, live for `ttl` from now.
    ///
    /// Re-putting an existing token replaces its record.
    async fn put(&self, token: &str, owner_id: &str, ttl: Duration)
        -> Result<(), TokenStoreError>;

    /// The live record for `token`, or `None` if absent or expired.
    async fn lookup(&self, token: &str) -> Result<Option<TokenRecord>, TokenStoreError>;

    /// Remove `token` early. Returns whether a record was removed.
    async fn revoke(&self, token: &str) -> Result<bool, TokenStoreError>;

    /// Physically remove expired records. Returns how many were removed.
    async fn sweep_expired(&self) -> Result<u64, TokenStoreError>;
}
