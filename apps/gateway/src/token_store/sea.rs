//! SeaORM-backed token store for Postgres and SQLite.

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use time::OffsetDateTime;

use super::{TokenRecord, TokenStore, TokenStoreError};
use crate::entities::user_tokens;

/// Token store over the `user_tokens` table.
///
/// SQL backends have no native TTL eviction, so every lookup compares
/// `expires_at` itself and [`TokenStore::sweep_expired`] reclaims rows.
#[derive(Debug, Clone)]
pub struct SeaTokenStore {
    conn: DatabaseConnection,
}

impl SeaTokenStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

impl From<user_tokens::Model> for TokenRecord {
    fn from(m: user_tokens::Model) -> Self {
        Self {
            id: m.id,
            token: m.token,
            owner_id: m.owner_id,
            created_at: m.created_at,
            expires_at: m.expires_at,
        }
    }
}

#[async_trait]
impl TokenStore for SeaTokenStore {
    async fn put(
        &self,
        token: &str,
        owner_id: &str,
        ttl: Duration,
    ) -> Result<(), TokenStoreError> {
        let record = TokenRecord::new(token, owner_id, ttl, OffsetDateTime::now_utc())?;

        let active = user_tokens::ActiveModel {
            id: Set(record.id),
            token: Set(record.token),
            owner_id: Set(record.owner_id),
            created_at: Set(record.created_at),
            expires_at: Set(record.expires_at),
        };

        user_tokens::Entity::insert(active)
            .on_conflict(
                OnConflict::column(user_tokens::Column::Token)
                    .update_columns([
                        user_tokens::Column::OwnerId,
                        user_tokens::Column::CreatedAt,
                        user_tokens::Column::ExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    async fn lookup(&self, token: &str) -> Result<Option<TokenRecord>, TokenStoreError> {
        let now = OffsetDateTime::now_utc();
        let row = user_tokens::Entity::find()
            .filter(user_tokens::Column::Token.eq(token))
            .one(&self.conn)
            .await?;

        Ok(row
            .map(TokenRecord::from)
            .filter(|record| record.is_live_at(now)))
    }

    async fn revoke(&self, token: &str) -> Result<bool, TokenStoreError> {
        let result = user_tokens::Entity::delete_many()
            .filter(user_tokens::Column::Token.eq(token))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn sweep_expired(&self) -> Result<u64, TokenStoreError> {
        let now = OffsetDateTime::now_utc();
        let result = user_tokens::Entity::delete_many()
            .filter(user_tokens::Column::ExpiresAt.lte(now))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}
