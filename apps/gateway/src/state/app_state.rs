use std::sync::Arc;

use crate::auth::token_codec::TokenCodec;
use crate::clients::Services;
use crate::config::PublicPaths;
use crate::token_store::TokenStore;

use super::security_config::SecurityConfig;

/// Shared, read-mostly resources handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// Signing configuration, fixed at startup
    pub security: SecurityConfig,
    /// Codec derived from `security`
    pub codec: TokenCodec,
    /// Allow-list of live tokens
    pub tokens: Arc<dyn TokenStore>,
    /// Downstream service callers
    pub services: Services,
    /// Paths the authentication gate lets through
    pub public_paths: PublicPaths,
}

impl AppState {
    pub fn new(
        security: SecurityConfig,
        tokens: Arc<dyn TokenStore>,
        services: Services,
        public_paths: PublicPaths,
    ) -> Self {
        Self {
            codec: TokenCodec::new(&security),
            security,
            tokens,
            services,
            public_paths,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("token_ttl", &self.security.token_ttl)
            .field("services", &self.services)
            .field("public_paths", &self.public_paths)
            .finish_non_exhaustive()
    }
}
