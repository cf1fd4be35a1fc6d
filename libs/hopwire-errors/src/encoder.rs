use axum::Json;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use http::{HeaderValue, StatusCode};

use crate::context::{REQUEST_ID_HEADER, RequestContext};
use crate::envelope::{ErrorBody, ErrorEnvelope};
use crate::kind::{ErrorKind, Severity};

/// Header telling the caller whether a failure was raised locally or
/// translated from a downstream response.
pub const ERROR_SOURCE_HEADER: &str = "x-error-source";

/// Turn a classified failure into its status and wire envelope.
///
/// Emits exactly one log record at the level of [`ErrorKind::severity`]:
/// WARN for client-caused kinds, ERROR for service-caused ones. The envelope of an [`ErrorKind::Internal`] carries
/// only the generic message.
#[must_use]
pub fn encode(err: &ErrorKind, ctx: &RequestContext) -> (StatusCode, ErrorEnvelope) {
    log_failure(err, ctx);

    let envelope = ErrorEnvelope {
        error: ErrorBody {
            code: err.code().as_str().to_owned(),
            message: err.public_message().to_owned(),
            timestamp: Utc::now(),
            request_id: ctx.request_id.clone(),
            path: ctx.path.clone(),
            details: err.details(),
        },
    };
    (err.status(), envelope)
}

/// [`encode`] plus the HTTP framing: JSON body, `x-request-id` and
/// `x-error-source` headers.
#[must_use]
pub fn encode_response(err: &ErrorKind, ctx: &RequestContext) -> Response {
    let (status, envelope) = encode(err, ctx);
    let mut response = (status, Json(envelope)).into_response();

    let headers = response.headers_mut();
    headers.insert(
        ERROR_SOURCE_HEADER,
        HeaderValue::from_static(err.error_source().as_str()),
    );
    if let Ok(v) = HeaderValue::from_str(&ctx.request_id) {
        headers.insert(REQUEST_ID_HEADER, v);
    }
    response
}

/// Emit one event at the tracing level matching `severity`.
macro_rules! at_level {
    ($severity:expr, $($arg:tt)+) => {
        match $severity {
            Severity::Warn => tracing::warn!($($arg)+),
            Severity::Error => tracing::error!($($arg)+),
        }
    };
}

fn log_failure(err: &ErrorKind, ctx: &RequestContext) {
    let request_id = ctx.request_id.as_str();
    let path = ctx.path.as_str();
    let code = err.code().as_str();
    let level = err.severity();

    match err {
        ErrorKind::Validation {
            message,
            field,
            reason,
        } => at_level!(
            level,
            request_id,
            path,
            code,
            field = %field,
            reason = %reason,
            "Validation error: {message}"
        ),
        ErrorKind::ResourceNotFound {
            message,
            resource_type,
            resource_id,
        } => at_level!(
            level,
            request_id,
            path,
            code,
            resource_type = %resource_type,
            resource_id = %resource_id,
            "Resource not found: {message}"
        ),
        ErrorKind::BusinessLogic { message } => {
            at_level!(level, request_id, path, code, "Business logic error: {message}");
        }
        ErrorKind::ExternalService {
            message,
            service_name,
        } => at_level!(
            level,
            request_id,
            path,
            code,
            service_name = %service_name,
            "External service error: {message}"
        ),
        ErrorKind::DownstreamService {
            message,
            service_name,
            status_code,
            ..
        } => at_level!(
            level,
            request_id,
            path,
            code,
            service_name = %service_name,
            downstream_status = status_code,
            "Downstream service error: {message}"
        ),
        ErrorKind::Internal { message } => at_level!(
            level,
            request_id,
            path,
            code,
            error = %message,
            "Unexpected error"
        ),
    }
}
