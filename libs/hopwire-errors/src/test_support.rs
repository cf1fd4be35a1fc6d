//! In-process test driver for a mounted service router.
//!
//! ```ignore
//! let app = AppHarness::new(mount("/api/v1", routes));
//! let env = app.get("/api/v1/not-found").expect(404).await.error("RESOURCE_NOT_FOUND");
//! ```

use axum::Router;
use axum::body::{Body, Bytes};
use http::header::{CONTENT_TYPE, HeaderMap};
use http::{HeaderName, HeaderValue, Method, Request, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;

use crate::envelope::ErrorEnvelope;

/// Wraps a router and hands out request builders that drive it with
/// `oneshot`, no socket involved.
#[derive(Clone)]
pub struct AppHarness {
    router: Router,
}

impl AppHarness {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn request(&self, method: Method, path: &str) -> RequestCase<'_> {
        RequestCase {
            router: &self.router,
            request: Request::builder().method(method).uri(path),
            body: Body::empty(),
        }
    }

    pub fn get(&self, path: &str) -> RequestCase<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestCase<'_> {
        self.request(Method::POST, path)
    }
}

/// One request under construction.
pub struct RequestCase<'a> {
    router: &'a Router,
    request: http::request::Builder,
    body: Body,
}

impl RequestCase<'_> {
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name = HeaderName::from_bytes(name.as_bytes()).expect("invalid header name");
        let value = HeaderValue::from_str(value).expect("invalid header value");
        self.request = self.request.header(name, value);
        self
    }

    /// Serialize `body` as the JSON request body.
    #[must_use]
    pub fn json(self, body: &impl Serialize) -> Self {
        let bytes = serde_json::to_vec(body).expect("request body does not serialize");
        self.raw_json(bytes)
    }

    /// Send `body` verbatim, labelled as JSON. Used for malformed payloads.
    #[must_use]
    pub fn raw_json(mut self, body: impl Into<Bytes>) -> Self {
        self.request = self.request.header(CONTENT_TYPE, "application/json");
        self.body = Body::from(body.into());
        self
    }

    pub async fn send(self) -> TestResponse {
        let request = self.request.body(self.body).expect("invalid test request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("response body is readable");
        TestResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    /// Send and assert the status.
    pub async fn expect(self, status: u16) -> TestResponse {
        let resp = self.send().await;
        assert_eq!(
            resp.status.as_u16(),
            status,
            "unexpected status, body: {}",
            String::from_utf8_lossy(&resp.body)
        );
        resp
    }

    /// Send, assert 200 and deserialize the body.
    pub async fn expect_ok<T: DeserializeOwned>(self) -> T {
        self.expect(200).await.parse()
    }
}

/// Fully collected response.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn assert_header(&self, name: &str, expected: &str) {
        assert_eq!(self.header(name), Some(expected), "header {name}");
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Value {
        self.parse()
    }

    pub fn parse<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "body is not a {}: {e}\n{}",
                std::any::type_name::<T>(),
                self.text()
            )
        })
    }

    /// Parse the body as an error envelope and assert its code.
    pub fn error(&self, code: &str) -> ErrorEnvelope {
        let env = ErrorEnvelope::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("body is not an error envelope: {e}\n{}", self.text()));
        assert_eq!(env.error.code, code, "error code");
        env
    }
}
