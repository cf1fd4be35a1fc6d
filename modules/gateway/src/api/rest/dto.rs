use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ProcessedOrder;

/// Body of `POST /process-order`. Fields are optional on the wire so that a
/// missing value is a validation failure, not a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOrderRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOrderResponse {
    pub message: String,
    pub order_id: String,
    pub user_validation: Value,
}

impl From<ProcessedOrder> for ProcessOrderResponse {
    fn from(order: ProcessedOrder) -> Self {
        Self {
            message: "Order processed successfully".to_owned(),
            order_id: order.order_id,
            user_validation: order.user_validation,
        }
    }
}
