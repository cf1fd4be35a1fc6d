use std::sync::Arc;

use axum::{Extension, Router};
use tracing::info;

use crate::api::rest::routes;
use crate::config::DownstreamConfig;
use crate::domain::DemoService;

/// Shared application state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) service: Arc<DemoService>,
}

/// Build the downstream service router, mounted under the configured base
/// path behind the shared error boundary.
#[must_use]
pub fn router(cfg: &DownstreamConfig) -> Router {
    info!(
        base_path = %cfg.base_path,
        name = %cfg.name,
        "Registering downstream demo routes"
    );

    let state = AppState {
        service: Arc::new(DemoService::new(cfg.name.clone())),
    };

    hopwire_errors::mount(&cfg.base_path, routes::routes().layer(Extension(state)))
}
