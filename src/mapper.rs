//! Typed parsing of upstream JSON bodies.
//!
//! Each function knows the shape its endpoint returns; nothing here sniffs
//! the body to guess. Field access reports the first missing or mistyped field.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::{event, Level};

use crate::{
    domain::{CustomerProfile, OrderOutcome, Product},
    errors::GatewayError,
};

const UNKNOWN_ORDER_ERROR: &str = "Unknown error occurred";

/// Inventory listing: a bare JSON array of product records.
pub fn map_products(body: &str) -> Result<Vec<Product>, GatewayError> {
    let items = match parse_json(body)? {
        Value::Array(items) => items,
        other => {
            return Err(GatewayError::parse("products", format!("expected array, got {}", type_name(&other))))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let record = item.as_object().ok_or_else(|| {
                GatewayError::parse(format!("products[{index}]"), format!("expected object, got {}", type_name(item)))
            })?;
            map_product(record)
        })
        .collect()
}

fn map_product(record: &Map<String, Value>) -> Result<Product, GatewayError> {
    let id = require_i64(record, "product_id")?;
    let name = require_str(record, "product_name")?.to_string();

    let quantity_available = require_i64(record, "quantity_available")?;
    if quantity_available < 0 {
        return Err(GatewayError::parse("quantity_available", format!("must not be negative, got {quantity_available}")));
    }

    let unit_price = require_decimal(record, "unit_price")?;
    if unit_price.is_sign_negative() && !unit_price.is_zero() {
        return Err(GatewayError::parse("unit_price", format!("must not be negative, got {unit_price}")));
    }

    Ok(Product {
        id,
        name,
        quantity_available,
        unit_price,
    })
}

/// Single customer lookup: any JSON object is accepted as-is.
pub fn map_customer(body: &str) -> Result<CustomerProfile, GatewayError> {
    match parse_json(body)? {
        Value::Object(profile) => Ok(profile),
        other => Err(GatewayError::parse("customer", format!("expected object, got {}", type_name(&other)))),
    }
}

/// Opaque documents relayed verbatim (regions, customer listing); only JSON validity is checked.
pub fn map_document(body: &str) -> Result<Value, GatewayError> {
    parse_json(body)
}

/// Order creation response. Never fails: an unreadable body becomes a failed outcome marked malformed.
///
/// On success the `success` flag itself is stripped and the remaining fields become the order data.
pub fn map_order_outcome(body: &str) -> OrderOutcome {
    match try_map_order_outcome(body) {
        Ok(outcome) => outcome,
        Err(e) => {
            event!(Level::WARN, error = %e, "order service response could not be read");
            OrderOutcome::unreadable(UNKNOWN_ORDER_ERROR)
        }
    }
}

fn try_map_order_outcome(body: &str) -> Result<OrderOutcome, GatewayError> {
    let mut fields = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            return Err(GatewayError::MalformedOutcome(format!("expected object, got {}", type_name(&other))))
        }
        Err(e) => return Err(GatewayError::MalformedOutcome(e.to_string())),
    };

    let success = fields
        .remove("success")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    if success {
        return Ok(OrderOutcome::accepted(fields));
    }

    let message = fields
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_ORDER_ERROR);
    Ok(OrderOutcome::rejected(message))
}

fn parse_json(body: &str) -> Result<Value, GatewayError> {
    serde_json::from_str(body).map_err(|e| GatewayError::parse("body", format!("invalid JSON: {e}")))
}

fn require<'a>(record: &'a Map<String, Value>, field: &str) -> Result<&'a Value, GatewayError> {
    match record.get(field) {
        Some(Value::Null) | None => Err(GatewayError::parse(field, "missing")),
        Some(value) => Ok(value),
    }
}

fn require_i64(record: &Map<String, Value>, field: &str) -> Result<i64, GatewayError> {
    let value = require(record, field)?;
    value
        .as_i64()
        .ok_or_else(|| GatewayError::parse(field, format!("expected integer, got {}", type_name(value))))
}

fn require_str<'a>(record: &'a Map<String, Value>, field: &str) -> Result<&'a str, GatewayError> {
    let value = require(record, field)?;
    value
        .as_str()
        .ok_or_else(|| GatewayError::parse(field, format!("expected string, got {}", type_name(value))))
}

fn require_decimal(record: &Map<String, Value>, field: &str) -> Result<Decimal, GatewayError> {
    match require(record, field)? {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|e| GatewayError::parse(field, format!("not a decimal: {e}")))
        }
        other => Err(GatewayError::parse(field, format!("expected number, got {}", type_name(other)))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn maps_a_product_listing() {
        let products = map_products(
            r#"[{"product_id":1,"product_name":"Widget","quantity_available":5,"unit_price":9.99}]"#,
        )
        .unwrap();

        assert_eq!(
            products,
            vec![Product {
                id: 1,
                name: "Widget".to_string(),
                quantity_available: 5,
                unit_price: Decimal::new(999, 2),
            }]
        );
    }

    #[test]
    fn integer_prices_are_accepted() {
        let products = map_products(
            r#"[{"product_id":2,"product_name":"Bolt","quantity_available":0,"unit_price":3}]"#,
        )
        .unwrap();
        assert_eq!(products[0].unit_price, Decimal::new(3, 0));
    }

    #[test]
    fn missing_unit_price_names_the_field() {
        let result = map_products(r#"[{"product_id":1,"product_name":"Widget","quantity_available":5}]"#);
        assert_matches!(result, Err(GatewayError::Parse { field, .. }) if field == "unit_price");
    }

    #[test]
    fn first_missing_field_in_schema_order_is_reported() {
        let result = map_products(r#"[{"product_id":1,"quantity_available":5}]"#);
        assert_matches!(result, Err(GatewayError::Parse { field, .. }) if field == "product_name");

        let result = map_products(r#"[{"product_name":"Widget"}]"#);
        assert_matches!(result, Err(GatewayError::Parse { field, .. }) if field == "product_id");
    }

    #[test]
    fn mistyped_field_names_the_field() {
        let result = map_products(
            r#"[{"product_id":"1","product_name":"Widget","quantity_available":5,"unit_price":1.0}]"#,
        );
        assert_matches!(result, Err(GatewayError::Parse { field, .. }) if field == "product_id");
    }

    #[test]
    fn negative_stock_is_rejected() {
        let result = map_products(
            r#"[{"product_id":1,"product_name":"Widget","quantity_available":-1,"unit_price":1.0}]"#,
        );
        assert_matches!(result, Err(GatewayError::Parse { field, .. }) if field == "quantity_available");
    }

    #[test]
    fn wrapped_listing_is_not_accepted() {
        let result = map_products(r#"{"products":[]}"#);
        assert_matches!(result, Err(GatewayError::Parse { field, .. }) if field == "products");
    }

    #[test]
    fn customer_must_be_an_object() {
        let profile = map_customer(r#"{"customer_id":7,"name":"Ada"}"#).unwrap();
        assert_eq!(profile["name"], "Ada");

        assert_matches!(map_customer("[1,2]"), Err(GatewayError::Parse { .. }));
        assert_matches!(map_customer("<html>"), Err(GatewayError::Parse { .. }));
    }

    #[test]
    fn documents_pass_through_verbatim() {
        let doc = map_document(r#"[{"region":"EU","tax_rate":0.2}]"#).unwrap();
        assert_eq!(doc, json!([{"region": "EU", "tax_rate": 0.2}]));
    }

    #[test]
    fn accepted_order_strips_success_flag() {
        let outcome = map_order_outcome(r#"{"success":true,"order_id":42}"#);
        assert!(outcome.success);
        assert_eq!(outcome.error_message, None);
        assert_eq!(Value::Object(outcome.order_data.unwrap()), json!({"order_id": 42}));
    }

    #[test]
    fn rejected_order_relays_service_error() {
        let outcome = map_order_outcome(r#"{"success":false,"error":"out of stock"}"#);
        assert_eq!(outcome, OrderOutcome::rejected("out of stock"));
    }

    #[test]
    fn absent_success_flag_counts_as_failure() {
        let outcome = map_order_outcome(r#"{"order_id":42}"#);
        assert_eq!(outcome, OrderOutcome::rejected("Unknown error occurred"));
    }

    #[test]
    fn malformed_order_body_degrades_to_generic_failure() {
        assert_eq!(map_order_outcome("Internal Server Error"), OrderOutcome::unreadable("Unknown error occurred"));
        assert_eq!(map_order_outcome("[true]"), OrderOutcome::unreadable("Unknown error occurred"));
        assert!(!map_order_outcome(r#"{"success":false}"#).malformed);
    }
}
