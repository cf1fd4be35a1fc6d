use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::kind::ErrorKind;

/// JSON body extractor whose rejections are classified.
///
/// A body that cannot be read or parsed is an unclassified failure and
/// surfaces as [`ErrorKind::Internal`]; the rejection text only reaches logs.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ErrorKind;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ErrorKind::internal(format!(
                "unreadable request body: {}",
                rejection.body_text()
            ))),
        }
    }
}
