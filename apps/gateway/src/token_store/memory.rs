use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;

use super::{TokenRecord, TokenStore, TokenStoreError};

/// In-process token store.
///
/// DashMap shards by key, so operations on different tokens do not contend.
/// Records vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<String, TokenRecord>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn put(
        &self,
        token: &str,
        owner_id: &str,
        ttl: Duration,
    ) -> Result<(), TokenStoreError> {
        let record = TokenRecord::new(token, owner_id, ttl, OffsetDateTime::now_utc())?;
        self.tokens.insert(record.token.clone(), record);
        Ok(())
    }

    async fn lookup(&self, token: &str) -> Result<Option<TokenRecord>, TokenStoreError> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .tokens
            .get(token)
            .filter(|entry| entry.value().is_live_at(now))
            .map(|entry| entry.value().clone()))
    }

    async fn revoke(&self, token: &str) -> Result<bool, TokenStoreError> {
        Ok(self.tokens.remove(token).is_some())
    }

    async fn sweep_expired(&self) -> Result<u64, TokenStoreError> {
        let now = OffsetDateTime::now_utc();
        let mut removed = 0u64;
        self.tokens.retain(|_, record| {
            let live = record.is_live_at(now);
            if !live {
                removed += 1;
            }
            live
        });
        Ok(removed)
    }
}
