//! Turns caller form fields into the payloads backend services expect.

use crate::{
    domain::{OrderLineRequest, OrderRequest},
    errors::GatewayError,
};

/// Builds an order from the raw checkout fields.
///
/// Product ids and quantities are paired by position. When the lists differ
/// in length the longer one is truncated to the shorter; that is the expected
/// checkout behaviour, not an error. Any unparsable token rejects the whole order.
pub fn build_order_payload(
    customer_id: Option<&str>,
    product_ids_csv: Option<&str>,
    quantities_csv: Option<&str>,
) -> Result<OrderRequest, GatewayError> {
    let (customer_id, product_ids_csv, quantities_csv) =
        match (customer_id, product_ids_csv, quantities_csv) {
            (Some(c), Some(p), Some(q)) => (c, p, q),
            (c, p, q) => {
                let missing: Vec<&str> = [
                    ("customer_id", c.is_none()),
                    ("product_ids", p.is_none()),
                    ("quantities", q.is_none()),
                ]
                .iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| *name)
                .collect();
                return Err(GatewayError::MissingField(missing.join(", ")));
            }
        };

    let customer_id = parse_int("customer_id", customer_id)?;
    let product_ids = parse_csv("product_ids", product_ids_csv)?;
    let quantities = parse_csv("quantities", quantities_csv)?;

    let mut lines = Vec::with_capacity(product_ids.len().min(quantities.len()));
    for (product_id, quantity) in product_ids.into_iter().zip(quantities) {
        if quantity <= 0 {
            return Err(GatewayError::validation(
                "quantities",
                format!("quantity for product {product_id} must be positive, got {quantity}"),
            ));
        }
        lines.push(OrderLineRequest { product_id, quantity });
    }

    Ok(OrderRequest { customer_id, lines })
}

/// Parses a customer id query parameter, defaulting to customer `1` when absent.
pub fn parse_customer_id(raw: Option<&str>) -> Result<i64, GatewayError> {
    match raw {
        Some(raw) => parse_int("customer ID", raw),
        None => Ok(1),
    }
}

/// Trailing empty tokens are dropped (`"1,2,"` is two items); an entirely empty
/// list stays one empty token so it still fails validation.
fn parse_csv(field: &str, csv: &str) -> Result<Vec<i64>, GatewayError> {
    let mut tokens: Vec<&str> = csv.split(',').collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens.into_iter().map(|token| parse_int(field, token)).collect()
}

fn parse_int(field: &str, raw: &str) -> Result<i64, GatewayError> {
    let token = raw.trim();
    token
        .parse::<i64>()
        .map_err(|_| GatewayError::validation(field, format!("{token:?} is not an integer")))
}
