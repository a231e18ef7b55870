mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use gateway::config::ServiceUrls;
use serde_json::{json, Value};

use support::auth::{bearer, live_token};
use support::{create_test_app, test_state, Canned, FakeService};

struct Downstreams {
    member: FakeService,
    cart: FakeService,
    product: FakeService,
}

impl Downstreams {
    async fn start() -> Self {
        let member = FakeService::start([(
            "/api/member/users",
            Canned::json(200, json!({ "content": [{ "id": "member-7" }], "totalElements": 1 })),
        )])
        .await;
        let cart = FakeService::start([
            (
                "/api/cart/getCart",
                Canned::json(200, json!({ "content": [{ "productId": "p-1", "qty": 2 }] })),
            ),
            (
                "/api/cart/addToCart",
                Canned::json(201, json!({ "productId": "p-1", "qty": 3 })),
            ),
            ("/api/cart/deleteFromCart/item-9", Canned::json(200, json!(true))),
        ])
        .await;
        let product = FakeService::start([(
            "/api/product/lists",
            Canned::json(200, json!({ "content": [{ "id": "p-1" }] })),
        )])
        .await;

        Self {
            member,
            cart,
            product,
        }
    }

    fn urls(&self) -> ServiceUrls {
        ServiceUrls {
            member: self.member.base_url.clone(),
            cart: self.cart.base_url.clone(),
            product: self.product.base_url.clone(),
        }
    }
}

#[actix_web::test]
async fn test_get_cart_forwards_identity() {
    let downstreams = Downstreams::start().await;
    let state = test_state(downstreams.urls()).await;
    let token = live_token(&state, "member-7").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/cart/getCart?page=1&size=5")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 200);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["data"], json!([{ "productId": "p-1", "qty": 2 }]));
    assert_eq!(body["errors"], Value::Null);

    let seen = downstreams.cart.last_request();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.path, "/api/cart/getCart");
    assert_eq!(seen.user_id.as_deref(), Some("member-7"));
    assert!(seen.query.contains("memberId=member-7"), "query: {}", seen.query);
    assert!(seen.query.contains("page=1"));
    assert!(seen.query.contains("size=5"));
    assert_eq!(seen.trace_id, trace_id);
}

#[actix_web::test]
async fn test_each_request_forwards_its_own_identity() {
    let downstreams = Downstreams::start().await;
    let state = test_state(downstreams.urls()).await;
    let alice = live_token(&state, "alice").await;
    let bob = live_token(&state, "bob").await;
    let app = create_test_app(state).build().await;

    for token in [&alice, &bob, &alice] {
        let req = test::TestRequest::get()
            .uri("/cart/getCart")
            .insert_header(bearer(token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let forwarded: Vec<Option<String>> = downstreams
        .cart
        .requests()
        .into_iter()
        .map(|r| r.user_id)
        .collect();
    assert_eq!(
        forwarded,
        vec![
            Some("alice".to_string()),
            Some("bob".to_string()),
            Some("alice".to_string())
        ]
    );
}

#[actix_web::test]
async fn test_public_catalog_forwards_no_identity() {
    let downstreams = Downstreams::start().await;
    let state = test_state(downstreams.urls()).await;
    let token = live_token(&state, "member-7").await;
    let app = create_test_app(state).build().await;

    let anonymous = test::TestRequest::get().uri("/product/lists").to_request();
    assert_eq!(
        test::call_service(&app, anonymous).await.status(),
        StatusCode::OK
    );

    let with_token = test::TestRequest::get()
        .uri("/product/lists")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, with_token).await;
    assert_eq!(body["data"], json!([{ "id": "p-1" }]));

    let requests = downstreams.product.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.user_id.is_none()));
    assert!(requests.iter().all(|r| r.trace_id.is_some()));
}

#[actix_web::test]
async fn test_current_user_reports_owner() {
    let downstreams = Downstreams::start().await;
    let state = test_state(downstreams.urls()).await;
    let token = live_token(&state, "member-7").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/member/currentUser")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["userId"], "member-7");
}

#[actix_web::test]
async fn test_member_listing_forwards_identity() {
    let downstreams = Downstreams::start().await;
    let state = test_state(downstreams.urls()).await;
    let token = live_token(&state, "member-7").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/member/users")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"], json!([{ "id": "member-7" }]));
    let seen = downstreams.member.last_request();
    assert_eq!(seen.user_id.as_deref(), Some("member-7"));
    assert_eq!(seen.query, "page=0&size=10");
}

#[actix_web::test]
async fn test_add_to_cart_forwards_body_and_status() {
    let downstreams = Downstreams::start().await;
    let state = test_state(downstreams.urls()).await;
    let token = live_token(&state, "member-7").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/cart/addToCart")
        .insert_header(bearer(&token))
        .set_json(json!({ "productId": "p-1", "qty": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "CREATED");

    let seen = downstreams.cart.last_request();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.user_id.as_deref(), Some("member-7"));
    assert!(seen.query.contains("memberId=member-7"));
    assert_eq!(seen.body, Some(json!({ "productId": "p-1", "qty": 3 })));
}

#[actix_web::test]
async fn test_delete_from_cart() {
    let downstreams = Downstreams::start().await;
    let state = test_state(downstreams.urls()).await;
    let token = live_token(&state, "member-7").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::delete()
        .uri("/cart/deleteFromCart/item-9")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"], json!({ "deleted": true }));
    let seen = downstreams.cart.last_request();
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.path, "/api/cart/deleteFromCart/item-9");
    assert_eq!(seen.user_id.as_deref(), Some("member-7"));
}

#[actix_web::test]
async fn test_downstream_redirect_is_not_followed() {
    let elsewhere = FakeService::start([(
        "/collect",
        Canned::json(200, json!({ "content": [] })),
    )])
    .await;
    let cart = FakeService::start([(
        "/api/cart/getCart",
        Canned::redirect(format!("{}/collect", elsewhere.base_url)),
    )])
    .await;
    let urls = ServiceUrls {
        member: "http://member.invalid".into(),
        cart: cart.base_url.clone(),
        product: "http://product.invalid".into(),
    };
    let state = test_state(urls).await;
    let token = live_token(&state, "member-7").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/cart/getCart")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(cart.requests().len(), 1);
    assert!(
        elsewhere.requests().is_empty(),
        "identity must not follow a redirect"
    );
}
