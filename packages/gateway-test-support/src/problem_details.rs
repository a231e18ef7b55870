//! Problem Details assertions that do not depend on gateway types.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Detail shared by every authentication rejection.
pub const UNAUTHORIZED_DETAIL: &str = "Authentication required";

/// Mirror of the gateway's error body.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Assert that response parts conform to the error contract.
///
/// Checks the status, the `application/problem+json` content type, that the
/// `x-trace-id` header matches the body's `trace_id`, and the code. Returns
/// the parsed body for further checks.
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body_bytes: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
) -> ProblemDetailsLike {
    assert_eq!(status, expected_status, "unexpected HTTP status");

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(
        content_type.starts_with("application/problem+json"),
        "expected problem+json, got {content_type:?}"
    );

    let problem: ProblemDetailsLike = serde_json::from_slice(body_bytes)
        .expect("Response body should be valid ProblemDetails JSON");

    let trace_id_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert_eq!(problem.trace_id, trace_id_header, "trace_id parity");

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    problem
}

/// Consume a service response and assert it is a Problem Details error.
pub async fn assert_problem_details<B>(
    resp: ServiceResponse<B>,
    expected_code: &str,
    expected_status: StatusCode,
) -> ProblemDetailsLike
where
    B: MessageBody,
{
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::body::to_bytes(resp.into_body())
        .await
        .unwrap_or_else(|_| panic!("failed to read response body"));

    assert_problem_details_from_parts(status, &headers, &body, expected_code, expected_status)
}

/// Assert the one and only shape of an authentication rejection.
pub async fn assert_unauthorized<B>(resp: ServiceResponse<B>) -> ProblemDetailsLike
where
    B: MessageBody,
{
    let problem = assert_problem_details(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED).await;
    assert_eq!(problem.detail, UNAUTHORIZED_DETAIL);
    problem
}
