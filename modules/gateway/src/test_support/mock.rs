//! Recording stand-in for the downstream service.
//!
//! Serves canned responses registered per method and path, and records every
//! request it receives so tests can assert what reached the downstream.
//!
//! ```ignore
//! let mock = MockDownstream::start().await;
//! mock.json("GET", "/api/v1/success", 200, json!({"message": "ok"}));
//! // point the gateway at mock.base_url()
//! let seen = mock.recorded_requests().await;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};

/// Canned body of a registered route.
#[derive(Clone, Debug)]
pub enum MockBody {
    Json(Value),
    Text(String),
}

#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: u16,
    pub body: MockBody,
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        match self.body {
            MockBody::Json(value) => (status, axum::Json(value)).into_response(),
            MockBody::Text(text) => (status, text).into_response(),
        }
    }
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub struct RouteKey {
    pub method: String,
    pub path: String,
}

/// A captured inbound request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// First value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("recorded body is not valid JSON")
    }
}

#[derive(Default)]
struct SharedState {
    recorded: Mutex<Vec<RecordedRequest>>,
    routes: DashMap<RouteKey, MockResponse>,
}

/// Mock downstream HTTP server bound to a random local port.
pub struct MockDownstream {
    addr: SocketAddr,
    state: Arc<SharedState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Drop for MockDownstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(h) = self.handle.take() {
            h.abort();
        }
    }
}

impl MockDownstream {
    /// Start the mock server on `127.0.0.1:0`.
    pub async fn start() -> Self {
        let state = Arc::new(SharedState::default());
        let app = Router::new()
            .fallback(dispatch)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock downstream");
        let addr = listener.local_addr().expect("failed to get local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("mock server error");
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Base URL with the given path prefix, for `DownstreamClientConfig::base_url`.
    pub fn base_url(&self, prefix: &str) -> String {
        format!("http://{}{prefix}", self.addr)
    }

    pub fn json(&self, method: &str, path: &str, status: u16, body: Value) {
        self.register(method, path, status, MockBody::Json(body));
    }

    pub fn text(&self, method: &str, path: &str, status: u16, body: impl Into<String>) {
        self.register(method, path, status, MockBody::Text(body.into()));
    }

    fn register(&self, method: &str, path: &str, status: u16, body: MockBody) {
        self.state.routes.insert(
            RouteKey {
                method: method.to_uppercase(),
                path: path.to_owned(),
            },
            MockResponse { status, body },
        );
    }

    /// Snapshot of all recorded requests, oldest first.
    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.state.recorded.lock().await.clone()
    }
}

async fn dispatch(
    State(state): State<Arc<SharedState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.recorded.lock().await.push(RecordedRequest {
        method: method.to_string(),
        uri: uri.to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect(),
        body: body.to_vec(),
    });

    let key = RouteKey {
        method: method.to_string(),
        path: uri.path().to_owned(),
    };
    if let Some(entry) = state.routes.get(&key) {
        return entry.value().clone().into_response();
    }

    MockResponse {
        status: 404,
        body: MockBody::Json(json!({"error": {"message": "no mock registered", "path": uri.path()}})),
    }
    .into_response()
}
