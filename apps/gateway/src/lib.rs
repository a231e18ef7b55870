#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod clients;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod request_ctx;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod token_store;

// Re-exports for public API
pub use auth::token_codec::{TokenCodec, VerifyError};
pub use config::{GatewayConfig, PublicPaths, ServiceUrls};
pub use error::{AppError, AuthFailure};
pub use extractors::RequestIdentity;
pub use infra::state::build_state;
pub use middleware::{AuthGate, RequestTrace, StructuredLogger, TraceSpan};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;
pub use token_store::{MemoryTokenStore, SeaTokenStore, TokenStore};

// Prelude for test convenience
pub mod prelude {
    pub use super::auth::*;
    pub use super::error::*;
    pub use super::extractors::*;
    pub use super::middleware::*;
    pub use super::state::*;
    pub use super::token_store::*;
}
