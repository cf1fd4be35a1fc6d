use std::sync::Arc;

use chrono::Utc;
use hopwire_errors::ErrorKind;
use http::Method;
use serde_json::{Value, json};
use tracing::info;

use super::client::DownstreamApi;
use super::translator::translate;

/// An order accepted by [`GatewayService::process_order`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProcessedOrder {
    pub order_id: String,
    pub user_validation: Value,
}

/// Gateway operations: forward to the downstream, or fail locally first.
pub(crate) struct GatewayService {
    name: String,
    downstream: Arc<dyn DownstreamApi>,
}

impl GatewayService {
    pub(crate) fn new(name: impl Into<String>, downstream: Arc<dyn DownstreamApi>) -> Self {
        Self {
            name: name.into(),
            downstream,
        }
    }

    /// Call the downstream; any failure comes back already translated.
    pub(crate) async fn forward(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ErrorKind> {
        self.downstream
            .call(method, path, body)
            .await
            .map_err(|failure| translate(failure, self.downstream.service_name()))
    }

    /// Downstream `/success`, tagged with the gateway's name.
    pub(crate) async fn proxied_success(&self) -> Result<Value, ErrorKind> {
        let mut body = self.forward(Method::GET, "/success", None).await?;
        if let Value::Object(map) = &mut body {
            map.insert("proxiedBy".to_owned(), Value::String(self.name.clone()));
        }
        Ok(body)
    }

    pub(crate) fn local_validation_error(&self) -> Result<Value, ErrorKind> {
        info!(gateway = %self.name, "Raising local validation error");
        Err(ErrorKind::validation(
            "Invalid request format",
            "requestType",
            "Request type must be specified",
        ))
    }

    pub(crate) fn local_business_error(&self) -> Result<Value, ErrorKind> {
        info!(gateway = %self.name, "Raising local business error");
        Err(ErrorKind::business(
            "User is not authorized to perform this action",
        ))
    }

    /// Check the order locally, then have the downstream validate the user.
    /// Local failures never reach the downstream.
    pub(crate) async fn process_order(
        &self,
        email: Option<&str>,
        product_id: Option<&str>,
        name: Option<&str>,
    ) -> Result<ProcessedOrder, ErrorKind> {
        let email = non_blank(email).ok_or_else(|| {
            ErrorKind::validation("Email is required", "email", "Email field cannot be empty")
        })?;
        let product_id = non_blank(product_id).ok_or_else(|| {
            ErrorKind::validation(
                "Product ID is required",
                "productId",
                "Product ID field cannot be empty",
            )
        })?;

        info!(gateway = %self.name, email, product_id, "Processing order");

        let user_validation = self
            .forward(
                Method::POST,
                "/validate-user",
                Some(json!({ "email": email, "name": name.unwrap_or_default() })),
            )
            .await?;

        Ok(ProcessedOrder {
            order_id: format!("ORD-{}", Utc::now().timestamp_millis()),
            user_validation,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
