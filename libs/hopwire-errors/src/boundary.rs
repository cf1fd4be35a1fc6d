//! Per-request error boundary.
//!
//! Handlers return `Result<_, ErrorKind>`. Converting an `ErrorKind` into a
//! response only parks the kind in the response extensions; the
//! [`error_boundary`] middleware is the one place that encodes it, using the
//! request's [`RequestContext`]. Panics and bare framework rejections are
//! coerced to a classified kind here as well, so every non-2xx response leaves
//! the service as exactly one envelope.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;
use http::{HeaderValue, StatusCode};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::context::{REQUEST_ID_HEADER, RequestContext};
use crate::encoder::encode_response;
use crate::kind::ErrorKind;

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Middleware: derive the [`RequestContext`], run the handler inside a
/// request span, and encode whatever failure comes back.
pub async fn error_boundary(mut req: Request, next: Next) -> Response {
    let ctx = RequestContext::from_headers(req.headers(), req.uri().path());
    req.extensions_mut().insert(ctx.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ctx.request_id,
        method = %req.method(),
        path = %ctx.path,
    );

    let outcome = AssertUnwindSafe(next.run(req))
        .catch_unwind()
        .instrument(span.clone())
        .await;

    span.in_scope(|| match outcome {
        Ok(response) => finish(response, &ctx),
        Err(panic) => encode_response(&ErrorKind::internal(panic_message(&*panic)), &ctx),
    })
}

fn finish(mut response: Response, ctx: &RequestContext) -> Response {
    if let Some(err) = response.extensions_mut().remove::<ErrorKind>() {
        return encode_response(&err, ctx);
    }

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return encode_response(&classify_rejection(status, ctx), ctx);
    }

    if let Ok(v) = HeaderValue::from_str(&ctx.request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, v);
    }
    response
}

/// Non-2xx responses produced without an `ErrorKind` come from the framework
/// (unknown route, wrong method) or from a layer; give them a kind.
fn classify_rejection(status: StatusCode, ctx: &RequestContext) -> ErrorKind {
    match status {
        StatusCode::NOT_FOUND => ErrorKind::not_found(
            format!("No endpoint found for {}", ctx.path),
            "Endpoint",
            ctx.path.clone(),
        ),
        other => ErrorKind::internal(format!("unclassified {other} response")),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("handler panicked: {s}")
    } else {
        "handler panicked".to_owned()
    }
}

/// Mount a service's routes under `base_path` behind the error boundary.
///
/// An empty base path (or `/`) mounts at the root.
#[must_use]
pub fn mount(base_path: &str, routes: Router) -> Router {
    let base = base_path.trim_end_matches('/');
    let router = if base.is_empty() {
        Router::new().merge(routes)
    } else {
        Router::new().nest(base, routes)
    };

    router
        .layer(middleware::from_fn(error_boundary))
        .layer(TraceLayer::new_for_http())
}
