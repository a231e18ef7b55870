use tracing::warn;

use crate::error::AuthFailure;
use crate::logging::pii::{token_fingerprint, Redacted};
use crate::request_ctx;

/// Log a rejected authentication attempt.
///
/// The raw token is never logged; a fingerprint allows correlating repeated
/// attempts with the same credential.
pub fn auth_rejected(reason: AuthFailure, path: &str, token: Option<&str>) {
    let trace_id = request_ctx::trace_id();
    let token_fp = token.map(token_fingerprint).unwrap_or_default();

    if reason.is_suspicious() {
        warn!(
            event = "SECURITY_AUTH_REJECTED",
            %trace_id,
            reason = reason.reason(),
            path,
            token_fp = %token_fp,
            "Tampered or corrupt credential"
        );
    } else {
        warn!(
            event = "SECURITY_AUTH_REJECTED",
            %trace_id,
            reason = reason.reason(),
            path,
            token_fp = %token_fp,
            "Authentication failure"
        );
    }
}

/// Log a security-relevant login failure event.
pub fn login_failed(reason: &str, email: Option<&str>) {
    let trace_id = request_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %email.map(Redacted).unwrap_or(Redacted("")),
        reason,
        "Authentication failure"
    );
}
