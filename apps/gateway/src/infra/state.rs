use std::sync::Arc;

use reqwest::Client;

use crate::clients::{downstream_http_client, Services};
use crate::config::{GatewayConfig, PublicPaths, ServiceUrls};
use crate::error::AppError;
use crate::infra::db::{connect, ensure_schema};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;
use crate::token_store::{MemoryTokenStore, SeaTokenStore, TokenStore};

const DB_POOL_MAX: u32 = 10;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: Option<SecurityConfig>,
    services: Option<ServiceUrls>,
    database_url: Option<String>,
    token_store: Option<Arc<dyn TokenStore>>,
    public_paths: PublicPaths,
    http_client: Option<Client>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: None,
            services: None,
            database_url: None,
            token_store: None,
            public_paths: PublicPaths::default(),
            http_client: None,
        }
    }

    /// Seed every setting from a loaded configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut builder = Self::new()
            .with_security(config.security.clone())
            .with_services(config.services.clone());
        builder.database_url = config.database_url.clone();
        builder
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = Some(security_config);
        self
    }

    pub fn with_services(mut self, services: ServiceUrls) -> Self {
        self.services = Some(services);
        self
    }

    /// Persist tokens in this database instead of memory.
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Use this store as-is; takes precedence over a database URL.
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn with_public_paths(mut self, public_paths: PublicPaths) -> Self {
        self.public_paths = public_paths;
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let security = self
            .security_config
            .ok_or_else(|| AppError::config("security configuration is required"))?;
        let urls = self
            .services
            .ok_or_else(|| AppError::config("service base URLs are required"))?;

        let tokens: Arc<dyn TokenStore> = match (self.token_store, self.database_url) {
            (Some(store), _) => store,
            (None, Some(url)) => {
                // single entrypoint: connect + create schema
                let conn = connect(&url, DB_POOL_MAX).await?;
                ensure_schema(&conn).await?;
                Arc::new(SeaTokenStore::new(conn))
            }
            (None, None) => Arc::new(MemoryTokenStore::new()),
        };

        let http = match self.http_client {
            Some(client) => client,
            None => downstream_http_client()?,
        };

        Ok(AppState::new(
            security,
            tokens,
            Services::new(&urls, http),
            self.public_paths,
        ))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
