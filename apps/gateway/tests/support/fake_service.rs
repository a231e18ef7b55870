//! A real HTTP server standing in for an internal service.
//!
//! Serves canned responses by path and records every request it receives,
//! including the forwarded `X-User-Id` header.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::{header, StatusCode};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use parking_lot::Mutex;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub user_id: Option<String>,
    pub trace_id: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
pub enum CannedBody {
    Json(Value),
    Raw(&'static str),
    Redirect(String),
    Empty,
}

#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub body: CannedBody,
}

impl Canned {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: CannedBody::Json(body),
        }
    }

    pub fn raw(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body: CannedBody::Raw(body),
        }
    }

    /// 302 pointing at `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: 302,
            body: CannedBody::Redirect(location.into()),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: CannedBody::Empty,
        }
    }
}

struct FakeState {
    routes: HashMap<String, Canned>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct FakeService {
    pub base_url: String,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: ServerHandle,
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn handle(req: HttpRequest, body: web::Bytes, state: web::Data<FakeState>) -> HttpResponse {
    state.recorded.lock().push(RecordedRequest {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        user_id: header(&req, "x-user-id"),
        trace_id: header(&req, "x-trace-id"),
        body: serde_json::from_slice(&body).ok(),
    });

    let Some(canned) = state.routes.get(req.path()) else {
        return HttpResponse::NotFound().json(json!({ "message": "no such route" }));
    };

    let mut response =
        HttpResponse::build(StatusCode::from_u16(canned.status).expect("valid canned status"));
    match &canned.body {
        CannedBody::Json(value) => response.json(value),
        CannedBody::Raw(text) => response.content_type("application/json").body(*text),
        CannedBody::Redirect(location) => response
            .insert_header((header::LOCATION, location.as_str()))
            .finish(),
        CannedBody::Empty => response.finish(),
    }
}

impl FakeService {
    /// Start on an ephemeral localhost port.
    pub async fn start<I>(routes: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Canned)>,
    {
        let routes: HashMap<String, Canned> = routes
            .into_iter()
            .map(|(path, canned)| (path.to_string(), canned))
            .collect();
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let data = web::Data::new(FakeState {
            routes,
            recorded: recorded.clone(),
        });

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .default_service(web::to(handle))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind fake service");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{addr}"),
            recorded,
            handle,
        }
    }

    /// Answers 404 to everything.
    pub async fn without_routes() -> Self {
        Self::start(Vec::new()).await
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("fake service should have received a request")
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// URL of a localhost port with nothing listening.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind throwaway listener");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
