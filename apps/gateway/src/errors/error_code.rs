//! Error codes for the gateway API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in Problem Details responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Any authentication failure; the internal reason is never exposed
    Unauthorized,

    // Request Validation
    /// Request body or query failed validation
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Route or resource not found
    NotFound,

    // Downstream services
    /// Downstream service answered with an error status
    DownstreamError,
    /// Downstream service could not be reached
    DownstreamUnavailable,
    /// Downstream service answered with an undecodable body
    DownstreamInvalidResponse,

    // System Errors
    /// Token store backend failure
    TokenStoreError,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::DownstreamError => "DOWNSTREAM_ERROR",
            Self::DownstreamUnavailable => "DOWNSTREAM_UNAVAILABLE",
            Self::DownstreamInvalidResponse => "DOWNSTREAM_INVALID_RESPONSE",
            Self::TokenStoreError => "TOKEN_STORE_ERROR",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
