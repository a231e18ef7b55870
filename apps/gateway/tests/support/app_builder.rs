use std::sync::atomic::{AtomicUsize, Ordering};

use actix_http::Request;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error, HttpMessage, HttpRequest, HttpResponse};
use gateway::config::ServiceUrls;
use gateway::extractors::RequestIdentity;
use gateway::infra::state::build_state;
use gateway::middleware::{AuthGate, RequestTrace, StructuredLogger, TraceSpan};
use gateway::request_ctx;
use gateway::routes;
use gateway::state::app_state::AppState;
use gateway::state::security_config::SecurityConfig;
use serde_json::json;

use super::auth::test_security;

/// Type alias for route configuration functions
type RouteConfigFn = Box<dyn Fn(&mut web::ServiceConfig) + Send + Sync>;

pub type TestResponse = ServiceResponse<EitherBody<BoxBody>>;

/// State with the in-memory token store and the given downstream URLs.
pub async fn test_state(urls: ServiceUrls) -> AppState {
    test_state_with(urls, test_security()).await
}

pub async fn test_state_with(urls: ServiceUrls, security: SecurityConfig) -> AppState {
    gateway_test_support::logging::init();
    build_state()
        .with_security(security)
        .with_services(urls)
        .build()
        .await
        .expect("test state should build")
}

/// Counts handler invocations and reports the identity it observed.
#[derive(Default)]
pub struct HitCounter {
    hits: AtomicUsize,
}

impl HitCounter {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn whoami(counter: web::Data<HitCounter>, req: HttpRequest) -> HttpResponse {
    counter.hits.fetch_add(1, Ordering::SeqCst);
    let from_extensions = req
        .extensions()
        .get::<RequestIdentity>()
        .map(|identity| identity.owner_id.clone());
    let from_context = request_ctx::current_identity().map(|identity| identity.owner_id);
    HttpResponse::Ok().json(json!({
        "extension": from_extensions,
        "context": from_context,
    }))
}

/// HitCounter routes: `/counter/whoami` is protected, `/swagger-ui/whoami` is public.
pub fn whoami_routes(counter: web::Data<HitCounter>) -> impl Fn(&mut web::ServiceConfig) + Send + Sync {
    move |cfg| {
        cfg.app_data(counter.clone())
            .route("/counter/whoami", web::get().to(whoami))
            .route("/swagger-ui/whoami", web::get().to(whoami));
    }
}

/// Builder for creating test Actix service instances
pub struct TestAppBuilder {
    state: AppState,
    extra_routes: Option<RouteConfigFn>,
}

impl TestAppBuilder {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            extra_routes: None,
        }
    }

    /// Register extra routes ahead of the production ones.
    pub fn with_routes<F>(mut self, config_fn: F) -> Self
    where
        F: Fn(&mut web::ServiceConfig) + Send + Sync + 'static,
    {
        self.extra_routes = Some(Box::new(config_fn) as RouteConfigFn);
        self
    }

    /// Build the service with the production middleware stack and routes.
    pub async fn build(
        self,
    ) -> impl Service<Request, Response = TestResponse, Error = Error> {
        let data = web::Data::new(self.state);
        let extra_routes = self.extra_routes;

        test::init_service(
            App::new()
                .wrap(AuthGate)
                .wrap(StructuredLogger)
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .app_data(data)
                .configure(move |cfg| {
                    if let Some(config_fn) = &extra_routes {
                        config_fn(cfg);
                    }
                })
                .configure(routes::configure),
        )
        .await
    }
}

pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder::new(state)
}
