use std::fmt;

use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::ErrorCode;
use crate::request_ctx;

/// Wire detail shared by every authentication failure.
pub const UNAUTHORIZED_DETAIL: &str = "Authentication required";

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Internal reason an authentication attempt was rejected.
///
/// Only ever logged; the response for every variant is an identical 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No `Authorization` header at all
    HeaderMissing,
    /// Header present but not `Bearer <token>`
    SchemeInvalid,
    /// Token signature does not match the configured secret
    SignatureInvalid,
    /// Token could not be parsed
    Malformed,
    /// Token is past its embedded expiry
    Expired,
    /// Token verified but is not live in the token store
    Revoked,
}

impl AuthFailure {
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::HeaderMissing => "header_missing",
            Self::SchemeInvalid => "scheme_invalid",
            Self::SignatureInvalid => "invalid_signature",
            Self::Malformed => "malformed_token",
            Self::Expired => "token_expired",
            Self::Revoked => "revoked_or_expired",
        }
    }

    /// Tampered or corrupt credentials are security relevant.
    pub const fn is_suspicious(&self) -> bool {
        matches!(self, Self::SignatureInvalid | Self::Malformed)
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: AuthFailure },
    #[error("Validation error: {detail}")]
    Validation { detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { detail: String },
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Downstream {service} responded {status}: {detail}")]
    Downstream {
        service: &'static str,
        status: u16,
        detail: String,
    },
    #[error("Downstream {service} unavailable: {detail}")]
    DownstreamUnavailable {
        service: &'static str,
        detail: String,
    },
    #[error("Downstream {service} returned an invalid response: {detail}")]
    DownstreamInvalidResponse {
        service: &'static str,
        detail: String,
    },
    #[error("Token store error: {detail}")]
    TokenStore { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::BadRequest { .. } => ErrorCode::BadRequest,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::Downstream { .. } => ErrorCode::DownstreamError,
            AppError::DownstreamUnavailable { .. } => ErrorCode::DownstreamUnavailable,
            AppError::DownstreamInvalidResponse { .. } => ErrorCode::DownstreamInvalidResponse,
            AppError::TokenStore { .. } => ErrorCode::TokenStoreError,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Detail string exposed on the wire.
    ///
    /// Authentication failures all share one detail so callers cannot tell
    /// which check failed. Storage and internal errors are not echoed.
    fn detail(&self) -> String {
        match self {
            AppError::Unauthorized { .. } => UNAUTHORIZED_DETAIL.to_string(),
            AppError::Validation { detail }
            | AppError::BadRequest { detail }
            | AppError::NotFound { detail }
            | AppError::Downstream { detail, .. } => detail.clone(),
            AppError::DownstreamUnavailable { service, .. } => {
                format!("{service} service is unavailable")
            }
            AppError::DownstreamInvalidResponse { service, .. } => {
                format!("{service} service returned an invalid response")
            }
            AppError::TokenStore { .. } => "Token store unavailable".to_string(),
            AppError::Internal { .. } | AppError::Config { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Downstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::DownstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DownstreamInvalidResponse { .. } => StatusCode::BAD_GATEWAY,
            AppError::TokenStore { .. } | AppError::Internal { .. } | AppError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn unauthorized(reason: AuthFailure) -> Self {
        Self::Unauthorized { reason }
    }

    pub fn invalid(field: &str, message: &str) -> Self {
        Self::Validation {
            detail: format!("{field}: {message}"),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest {
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    /// The internal authentication reason, if this is an auth rejection.
    pub fn auth_failure(&self) -> Option<AuthFailure> {
        match self {
            AppError::Unauthorized { reason } => Some(*reason),
            _ => None,
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str();
        let trace_id = request_ctx::trace_id();

        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        }

        let problem_details = ProblemDetails {
            type_: format!("https://gateway.shop.local/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail: self.detail(),
            code: code.to_string(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
