use axum::Json;
use axum::extract::Extension;
use hopwire_errors::{ErrorKind, JsonBody};

use crate::api::rest::dto::{SuccessResponse, ValidateUserRequest, ValidateUserResponse};
use crate::module::AppState;

pub async fn success(Extension(state): Extension<AppState>) -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "Operation completed successfully".to_owned(),
        service: state.service.name().to_owned(),
    })
}

pub async fn validation_error(Extension(state): Extension<AppState>) -> Result<(), ErrorKind> {
    state.service.validation_error()
}

pub async fn not_found(Extension(state): Extension<AppState>) -> Result<(), ErrorKind> {
    state.service.not_found()
}

pub async fn business_error(Extension(state): Extension<AppState>) -> Result<(), ErrorKind> {
    state.service.business_error()
}

pub async fn external_service_error(
    Extension(state): Extension<AppState>,
) -> Result<(), ErrorKind> {
    state.service.external_service_error()
}

pub async fn internal_error(Extension(state): Extension<AppState>) -> Result<(), ErrorKind> {
    state.service.internal_error()
}

pub async fn validate_user(
    Extension(state): Extension<AppState>,
    JsonBody(req): JsonBody<ValidateUserRequest>,
) -> Result<Json<ValidateUserResponse>, ErrorKind> {
    let user = state
        .service
        .validate_user(req.email.as_deref(), req.name.as_deref())?;
    Ok(Json(user.into()))
}
