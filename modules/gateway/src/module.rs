use std::sync::Arc;

use axum::{Extension, Router};
use hopwire_errors::{ERROR_SOURCE_HEADER, REQUEST_ID_HEADER};
use http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::api::rest::routes;
use crate::config::GatewayConfig;
use crate::domain::GatewayService;
use crate::domain::client::{DownstreamApi, HttpDownstreamClient};

/// Shared application state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) service: Arc<GatewayService>,
}

/// Build the gateway router with an HTTP client for the configured
/// downstream.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn router(cfg: &GatewayConfig) -> anyhow::Result<Router> {
    let client = HttpDownstreamClient::new(&cfg.downstream)?;
    info!(
        downstream = %cfg.downstream.base_url,
        service = %cfg.downstream.service_name,
        request_timeout_secs = cfg.downstream.request_timeout_secs,
        connect_timeout_secs = cfg.downstream.connect_timeout_secs,
        "Downstream client ready"
    );
    Ok(router_with_client(cfg, Arc::new(client)))
}

/// Build the gateway router around any [`DownstreamApi`].
#[must_use]
pub fn router_with_client(cfg: &GatewayConfig, downstream: Arc<dyn DownstreamApi>) -> Router {
    info!(
        base_path = %cfg.base_path,
        name = %cfg.name,
        "Registering gateway routes"
    );

    let state = AppState {
        service: Arc::new(GatewayService::new(cfg.name.clone(), downstream)),
    };

    let app = hopwire_errors::mount(&cfg.base_path, routes::routes().layer(Extension(state)));
    match cors_layer(&cfg.cors_allowed_origins) {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

fn cors_layer(allowed: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = allowed
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, request_id.clone()])
            .expose_headers([request_id, HeaderName::from_static(ERROR_SOURCE_HEADER)]),
    )
}
