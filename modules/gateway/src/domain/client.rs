//! Outbound calls to the downstream service.
//!
//! A call ends in one of three ways: a 2xx JSON body, a non-2xx response the
//! downstream produced, or a transport failure (nothing usable came back).
//! The last two are reported as a [`DownstreamFailure`] for the translator.

use std::time::Duration;

use async_trait::async_trait;
use hopwire_errors::{REQUEST_ID_HEADER, new_request_id};
use http::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DownstreamClientConfig;

/// Message used when a downstream error body has no readable `error.message`.
pub const UNKNOWN_DOWNSTREAM_ERROR: &str = "Unknown error from downstream service";

/// Status recorded for failures where no downstream status exists.
const TRANSPORT_FAILURE_STATUS: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOrigin {
    /// The downstream answered with a non-2xx status.
    Response,
    /// Connect error, timeout, unreadable body, or a 2xx body that is not JSON.
    Transport,
}

/// A failed downstream call, before translation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("downstream call failed ({origin:?}, status {status_code})")]
pub struct DownstreamFailure {
    pub origin: FailureOrigin,
    pub status_code: u16,
    /// Response body for response failures, error text for transport ones.
    pub raw_body: String,
    /// Best-effort `error.message` of a response failure.
    pub message: Option<String>,
}

impl DownstreamFailure {
    #[must_use]
    pub fn response(status_code: u16, raw_body: impl Into<String>) -> Self {
        let raw_body = raw_body.into();
        Self {
            origin: FailureOrigin::Response,
            status_code,
            message: Some(extract_error_message(&raw_body)),
            raw_body,
        }
    }

    #[must_use]
    pub fn transport(error_text: impl Into<String>) -> Self {
        Self {
            origin: FailureOrigin::Transport,
            status_code: TRANSPORT_FAILURE_STATUS,
            raw_body: error_text.into(),
            message: None,
        }
    }
}

/// Read `error.message` from a downstream error body.
///
/// Anything that is not an envelope with a string message yields
/// [`UNKNOWN_DOWNSTREAM_ERROR`].
#[must_use]
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| UNKNOWN_DOWNSTREAM_ERROR.to_owned())
}

/// The gateway's view of the downstream service.
#[async_trait]
pub trait DownstreamApi: Send + Sync {
    /// Name used when reporting failures of this downstream.
    fn service_name(&self) -> &str;

    /// Call `path` (relative to the downstream base URL) and return the parsed
    /// 2xx JSON body.
    ///
    /// # Errors
    /// Returns [`DownstreamFailure`] for non-2xx responses and transport
    /// failures.
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, DownstreamFailure>;
}

/// [`DownstreamApi`] over HTTP, one shared `reqwest::Client` per target.
pub struct HttpDownstreamClient {
    http: reqwest::Client,
    base_url: String,
    service_name: String,
    request_timeout: Duration,
}

impl HttpDownstreamClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(cfg: &DownstreamClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            service_name: cfg.service_name.clone(),
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
        })
    }

    async fn exchange(
        &self,
        method: Method,
        url: &str,
        request_id: &str,
        body: Option<Value>,
    ) -> Result<Value, DownstreamFailure> {
        let mut req = self
            .http
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = req
            .send()
            .await
            .map_err(|e| DownstreamFailure::transport(error_chain(&e)))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DownstreamFailure::transport(error_chain(&e)))?;

        if !status.is_success() {
            return Err(DownstreamFailure::response(status.as_u16(), text));
        }

        serde_json::from_str(&text).map_err(|e| {
            DownstreamFailure::transport(format!("invalid JSON in downstream response: {e}"))
        })
    }
}

#[async_trait]
impl DownstreamApi for HttpDownstreamClient {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, DownstreamFailure> {
        let url = format!("{}{path}", self.base_url);
        let request_id = new_request_id();
        debug!(
            service = %self.service_name,
            %method,
            %url,
            downstream_request_id = %request_id,
            "Calling downstream"
        );

        let outcome = tokio::time::timeout(
            self.request_timeout,
            self.exchange(method, &url, &request_id, body),
        )
        .await
        .unwrap_or_else(|_| {
            Err(DownstreamFailure::transport(format!(
                "request to {url} timed out after {}s",
                self.request_timeout.as_secs()
            )))
        });

        if let Err(failure) = &outcome {
            warn!(
                service = %self.service_name,
                %url,
                downstream_request_id = %request_id,
                origin = ?failure.origin,
                status = failure.status_code,
                "Downstream call failed"
            );
        }
        outcome
    }
}

/// Render an error and its sources on one line.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
