use axum::Router;
use axum::routing::{get, post};

use super::handlers;

/// Gateway endpoints, relative to the service base path.
pub fn routes() -> Router {
    Router::new()
        .route("/proxy/success", get(handlers::proxy_success))
        .route(
            "/proxy/validation-error",
            get(handlers::proxy_validation_error),
        )
        .route("/proxy/not-found", get(handlers::proxy_not_found))
        .route("/proxy/business-error", get(handlers::proxy_business_error))
        .route(
            "/proxy/external-service-error",
            get(handlers::proxy_external_service_error),
        )
        .route("/proxy/internal-error", get(handlers::proxy_internal_error))
        .route("/proxy/validate-user", post(handlers::proxy_validate_user))
        .route(
            "/local-validation-error",
            get(handlers::local_validation_error),
        )
        .route("/local-business-error", get(handlers::local_business_error))
        .route("/process-order", post(handlers::process_order))
}
