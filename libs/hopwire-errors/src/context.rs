use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::HeaderMap;
use http::request::Parts;

/// Correlation header read on inbound requests and set on outbound calls.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generate a fresh correlation token.
#[must_use]
pub fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Per-request correlation data used in logs and error envelopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub path: String,
}

impl RequestContext {
    /// Derive the context for an inbound request: the caller's
    /// `x-request-id` when present and non-empty, otherwise a new one.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, path: impl Into<String>) -> Self {
        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map_or_else(new_request_id, ToOwned::to_owned);
        Self {
            request_id,
            path: path.into(),
        }
    }
}

/// Handlers can take `RequestContext` as an argument. The boundary middleware
/// stores the context in request extensions; outside of it the context is
/// derived on the spot.
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<Self>() {
            return Ok(ctx.clone());
        }
        Ok(Self::from_headers(&parts.headers, parts.uri.path()))
    }
}
