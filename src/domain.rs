use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub quantity_available: i64,
    pub unit_price: Decimal,
}

/// Serialized field names match the order service's create contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_id: i64,
    #[serde(rename = "products")]
    pub lines: Vec<OrderLineRequest>,
}

/// Result of an order submission as reported by the order service.
///
/// Exactly one of `order_data` / `error_message` is set. `malformed` marks a
/// failure caused by an unreadable response rather than a refusal by the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderOutcome {
    pub success: bool,
    pub order_data: Option<Map<String, Value>>,
    pub error_message: Option<String>,
    #[serde(skip)]
    pub malformed: bool,
}

impl OrderOutcome {
    pub fn accepted(order_data: Map<String, Value>) -> Self {
        OrderOutcome {
            success: true,
            order_data: Some(order_data),
            error_message: None,
            malformed: false,
        }
    }

    pub fn rejected(error_message: impl Into<String>) -> Self {
        OrderOutcome {
            success: false,
            order_data: None,
            error_message: Some(error_message.into()),
            malformed: false,
        }
    }

    pub fn unreadable(error_message: impl Into<String>) -> Self {
        OrderOutcome {
            malformed: true,
            ..OrderOutcome::rejected(error_message)
        }
    }
}

/// Customer record owned by the customer service; only checked to be a JSON object.
pub type CustomerProfile = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealthEntry {
    pub name: String,
    pub url: String,
    pub status: HealthStatus,
    pub detail: String,
}
