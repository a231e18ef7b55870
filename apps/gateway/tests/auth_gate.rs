mod support;

use std::time::Duration;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web};
use gateway::auth::TokenClaims;
use gateway::config::ServiceUrls;
use gateway::state::security_config::SecurityConfig;
use gateway::TokenCodec;
use gateway_test_support::problem_details::{assert_unauthorized, ProblemDetailsLike};
use serde_json::Value;

use support::app_builder::{whoami_routes, HitCounter};
use support::auth::{bearer, expired_token, live_token, unstored_token};
use support::{create_test_app, test_state};

fn unreachable_services() -> ServiceUrls {
    ServiceUrls {
        member: "http://member.invalid".into(),
        cart: "http://cart.invalid".into(),
        product: "http://product.invalid".into(),
    }
}

#[actix_web::test]
async fn test_public_path_needs_no_token() {
    let counter = web::Data::new(HitCounter::default());
    let state = test_state(unreachable_services()).await;
    let app = create_test_app(state)
        .with_routes(whoami_routes(counter.clone()))
        .build()
        .await;

    let req = test::TestRequest::get().uri("/swagger-ui/whoami").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["extension"], Value::Null);
    assert_eq!(body["context"], Value::Null);
    assert_eq!(counter.hits(), 1);
}

#[actix_web::test]
async fn test_public_path_ignores_presented_token() {
    let counter = web::Data::new(HitCounter::default());
    let state = test_state(unreachable_services()).await;
    let token = live_token(&state, "member-7").await;
    let app = create_test_app(state)
        .with_routes(whoami_routes(counter.clone()))
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/swagger-ui/whoami")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["extension"], Value::Null);
    assert_eq!(body["context"], Value::Null);
}

#[actix_web::test]
async fn test_live_token_establishes_identity() {
    let counter = web::Data::new(HitCounter::default());
    let state = test_state(unreachable_services()).await;
    let token = live_token(&state, "member-7").await;
    let app = create_test_app(state)
        .with_routes(whoami_routes(counter.clone()))
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/counter/whoami")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-trace-id"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["extension"], "member-7");
    assert_eq!(body["context"], "member-7");
    assert_eq!(counter.hits(), 1);
}

#[actix_web::test]
async fn test_missing_header_rejected() {
    let counter = web::Data::new(HitCounter::default());
    let state = test_state(unreachable_services()).await;
    let app = create_test_app(state)
        .with_routes(whoami_routes(counter.clone()))
        .build()
        .await;

    let req = test::TestRequest::get().uri("/counter/whoami").to_request();
    let resp = test::call_service(&app, req).await;

    assert_unauthorized(resp).await;
    assert_eq!(counter.hits(), 0);
}

#[actix_web::test]
async fn test_every_rejection_looks_the_same() {
    let counter = web::Data::new(HitCounter::default());
    let state = test_state(unreachable_services()).await;

    let live = live_token(&state, "member-7").await;
    let expired = expired_token(&state, "member-7").await;
    let never_stored = unstored_token(&state, "member-7");
    assert_ne!(never_stored, live);

    let foreign_codec = TokenCodec::new(&SecurityConfig::new(
        "another_deployment_secret_0123456789".as_bytes(),
    ));
    let foreign = foreign_codec
        .issue("member-7", TokenClaims::new(), Duration::from_secs(300))
        .unwrap();
    state
        .tokens
        .put(&foreign, "member-7", Duration::from_secs(300))
        .await
        .unwrap();

    let revoked = live_token(&state, "member-8").await;
    assert!(state.tokens.revoke(&revoked).await.unwrap());

    let mut tampered = live.clone();
    tampered.push('x');

    let app = create_test_app(state)
        .with_routes(whoami_routes(counter.clone()))
        .build()
        .await;

    let authorizations = [
        None,
        Some("Token abc".to_string()),
        Some("Bearer".to_string()),
        Some("Bearer not.a.jwt".to_string()),
        Some(format!("Bearer {tampered}")),
        Some(format!("Bearer {foreign}")),
        Some(format!("Bearer {expired}")),
        Some(format!("Bearer {never_stored}")),
        Some(format!("Bearer {revoked}")),
    ];

    let mut problems: Vec<ProblemDetailsLike> = Vec::new();
    for authorization in authorizations {
        let mut req = test::TestRequest::get().uri("/counter/whoami");
        if let Some(value) = &authorization {
            req = req.insert_header((header::AUTHORIZATION, value.clone()));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        problems.push(assert_unauthorized(resp).await);
    }

    assert_eq!(counter.hits(), 0, "no rejected request may reach the handler");

    let first = &problems[0];
    for problem in &problems[1..] {
        assert_eq!(problem.type_, first.type_);
        assert_eq!(problem.title, first.title);
        assert_eq!(problem.detail, first.detail);
        assert_eq!(problem.code, first.code);
        assert_ne!(problem.trace_id, first.trace_id);
    }
}

#[actix_web::test]
async fn test_gate_runs_before_routing() {
    let state = test_state(unreachable_services()).await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get().uri("/no/such/route").to_request();
    let resp = test::call_service(&app, req).await;

    assert_unauthorized(resp).await;
}

#[actix_web::test]
async fn test_health_is_public() {
    let state = test_state(unreachable_services()).await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 200);
    assert_eq!(body["data"]["token_store"], "ok");
}
