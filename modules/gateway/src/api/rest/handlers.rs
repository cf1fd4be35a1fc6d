use axum::Json;
use axum::extract::Extension;
use hopwire_errors::{ErrorKind, JsonBody};
use http::Method;
use serde_json::Value;

use crate::api::rest::dto::{ProcessOrderRequest, ProcessOrderResponse};
use crate::module::AppState;

type JsonResult = Result<Json<Value>, ErrorKind>;

async fn forward_get(state: &AppState, path: &str) -> JsonResult {
    state.service.forward(Method::GET, path, None).await.map(Json)
}

// -- proxied endpoints --

pub async fn proxy_success(Extension(state): Extension<AppState>) -> JsonResult {
    state.service.proxied_success().await.map(Json)
}

pub async fn proxy_validation_error(Extension(state): Extension<AppState>) -> JsonResult {
    forward_get(&state, "/validation-error").await
}

pub async fn proxy_not_found(Extension(state): Extension<AppState>) -> JsonResult {
    forward_get(&state, "/not-found").await
}

pub async fn proxy_business_error(Extension(state): Extension<AppState>) -> JsonResult {
    forward_get(&state, "/business-error").await
}

pub async fn proxy_external_service_error(Extension(state): Extension<AppState>) -> JsonResult {
    forward_get(&state, "/external-service-error").await
}

pub async fn proxy_internal_error(Extension(state): Extension<AppState>) -> JsonResult {
    forward_get(&state, "/internal-error").await
}

pub async fn proxy_validate_user(
    Extension(state): Extension<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> JsonResult {
    state
        .service
        .forward(Method::POST, "/validate-user", Some(body))
        .await
        .map(Json)
}

// -- local endpoints --

pub async fn local_validation_error(Extension(state): Extension<AppState>) -> JsonResult {
    state.service.local_validation_error().map(Json)
}

pub async fn local_business_error(Extension(state): Extension<AppState>) -> JsonResult {
    state.service.local_business_error().map(Json)
}

pub async fn process_order(
    Extension(state): Extension<AppState>,
    JsonBody(req): JsonBody<ProcessOrderRequest>,
) -> Result<Json<ProcessOrderResponse>, ErrorKind> {
    let order = state
        .service
        .process_order(
            req.email.as_deref(),
            req.product_id.as_deref(),
            req.name.as_deref(),
        )
        .await?;
    Ok(Json(order.into()))
}
