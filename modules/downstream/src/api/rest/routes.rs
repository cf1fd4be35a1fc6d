use axum::Router;
use axum::routing::{get, post};

use super::handlers;

/// Demo endpoints, relative to the service base path.
pub fn routes() -> Router {
    Router::new()
        .route("/success", get(handlers::success))
        .route("/validation-error", get(handlers::validation_error))
        .route("/not-found", get(handlers::not_found))
        .route("/business-error", get(handlers::business_error))
        .route(
            "/external-service-error",
            get(handlers::external_service_error),
        )
        .route("/internal-error", get(handlers::internal_error))
        .route("/validate-user", post(handlers::validate_user))
}
