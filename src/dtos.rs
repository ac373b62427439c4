use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    domain::{OrderOutcome, Product, ServiceHealthEntry},
    errors::{ErrorKind, GatewayError},
};

pub trait Response{}

impl Response for Vec<Product>{}
impl Response for Vec<ServiceHealthEntry>{}
impl Response for Map<String, Value>{}
impl Response for Value{}

/// What the view layer receives for every request: a success flag plus either
/// a payload or a human-readable error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorKind>,
}

impl<T: Response> Outcome<T> {
    pub fn ok(payload: T) -> Self {
        Outcome {
            success: true,
            payload: Some(payload),
            error_message: None,
            code: None,
        }
    }

    pub fn failed(code: ErrorKind, message: impl Into<String>) -> Self {
        Outcome {
            success: false,
            payload: None,
            error_message: Some(message.into()),
            code: Some(code),
        }
    }

    /// Caller-input failures are described as-is; anything else blames `service`.
    pub fn from_error(error: &GatewayError, service: &str) -> Self {
        let message = if error.is_caller_error() {
            error.to_string()
        } else {
            format!("Cannot connect to {service}: {error}")
        };
        Outcome::failed(error.kind(), message)
    }
}

impl From<OrderOutcome> for Outcome<Map<String, Value>> {
    fn from(outcome: OrderOutcome) -> Self {
        match (outcome.success, outcome.order_data) {
            (true, Some(order_data)) => Outcome::ok(order_data),
            (true, None) => Outcome::ok(Map::new()),
            (false, _) => {
                let code = if outcome.malformed {
                    ErrorKind::MalformedOutcome
                } else {
                    ErrorKind::OrderRejected
                };
                Outcome::failed(
                    code,
                    outcome
                        .error_message
                        .unwrap_or_else(|| "Unknown error occurred".to_string()),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn successful_outcome_omits_error_fields() {
        let outcome = Outcome::ok(json!({"regions": ["EU"]}));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": true, "payload": {"regions": ["EU"]}})
        );
    }

    #[test]
    fn upstream_failures_name_the_service() {
        let outcome: Outcome<Value> =
            Outcome::from_error(&GatewayError::UpstreamStatus { status: 503 }, "Pricing Service");

        assert!(!outcome.success);
        assert_eq!(
            outcome.error_message.as_deref(),
            Some("Cannot connect to Pricing Service: HTTP error code: 503")
        );
        assert_eq!(outcome.code, Some(ErrorKind::UpstreamStatus));
    }

    #[test]
    fn caller_failures_describe_the_input() {
        let outcome: Outcome<Value> =
            Outcome::from_error(&GatewayError::MissingField("quantities".into()), "Order Service");

        assert_eq!(outcome.error_message.as_deref(), Some("Missing required fields: quantities"));
        assert_eq!(outcome.code, Some(ErrorKind::MissingField));
    }

    #[test]
    fn order_outcomes_convert_to_the_uniform_shape() {
        let mut data = Map::new();
        data.insert("order_id".into(), json!(42));

        let accepted: Outcome<Map<String, Value>> = OrderOutcome::accepted(data.clone()).into();
        assert_eq!(accepted, Outcome::ok(data));

        let rejected: Outcome<Map<String, Value>> = OrderOutcome::rejected("out of stock").into();
        assert_eq!(
            serde_json::to_value(&rejected).unwrap(),
            json!({"success": false, "error": "out of stock", "code": "ORDER_REJECTED"})
        );

        let unreadable: Outcome<Map<String, Value>> = OrderOutcome::unreadable("Unknown error occurred").into();
        assert_eq!(unreadable.code, Some(ErrorKind::MalformedOutcome));
    }
}
