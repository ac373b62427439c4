use serde::Serialize;

/// Failure kinds crossing component boundaries inside the gateway.
///
/// Every variant is caught at the handler boundary and turned into an
/// [`Outcome`](crate::dtos::Outcome); none of them reach the renderer raw.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Required caller input was absent.
    #[error("Missing required fields: {0}")]
    MissingField(String),

    /// Caller input was present but malformed.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Upstream unreachable, DNS failure, or a connect/read timeout.
    #[error("{0}")]
    Connection(#[source] reqwest::Error),

    /// Non-2xx status on a call whose contract treats that as fatal.
    #[error("HTTP error code: {status}")]
    UpstreamStatus { status: u16 },

    /// Upstream body was missing or mistyped a required field.
    #[error("unexpected response, field `{field}`: {reason}")]
    Parse { field: String, reason: String },

    /// Order service answered but the body could not be understood.
    #[error("malformed order service response: {0}")]
    MalformedOutcome(String),

    #[error("failed to encode request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        GatewayError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(field: impl Into<String>, reason: impl Into<String>) -> Self {
        GatewayError::Parse {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::MissingField(_) => ErrorKind::MissingField,
            GatewayError::Validation { .. } => ErrorKind::Validation,
            GatewayError::Connection(_) => ErrorKind::Connection,
            GatewayError::UpstreamStatus { .. } => ErrorKind::UpstreamStatus,
            GatewayError::Parse { .. } => ErrorKind::Parse,
            GatewayError::MalformedOutcome(_) | GatewayError::Serialization(_) => {
                ErrorKind::MalformedOutcome
            }
        }
    }

    /// True when the failure is the caller's fault rather than an upstream's.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingField(_) | GatewayError::Validation { .. }
        )
    }
}

/// Stable machine-readable code handed to the renderer alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    MissingField,
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    #[serde(rename = "CONNECTION_ERROR")]
    Connection,
    UpstreamStatus,
    #[serde(rename = "PARSE_ERROR")]
    Parse,
    MalformedOutcome,
    /// The order service answered `success: false`.
    OrderRejected,
}

/// Startup configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be an absolute http(s) URL, got {value:?}")]
    InvalidUrl { var: String, value: String },

    #[error("{var} must be a positive number of milliseconds, got {value:?}")]
    InvalidTimeout { var: String, value: String },

    #[error("{var} must be a valid port, got {value:?}")]
    InvalidPort { var: String, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_are_distinguished_from_upstream_errors() {
        assert!(GatewayError::MissingField("customer_id".into()).is_caller_error());
        assert!(GatewayError::validation("customer ID", "not a number").is_caller_error());
        assert!(!GatewayError::UpstreamStatus { status: 503 }.is_caller_error());
        assert!(!GatewayError::parse("unit_price", "missing").is_caller_error());
    }

    #[test]
    fn error_kinds_serialize_to_stable_codes() {
        let codes: Vec<String> = [
            ErrorKind::MissingField,
            ErrorKind::Validation,
            ErrorKind::Connection,
            ErrorKind::UpstreamStatus,
            ErrorKind::Parse,
            ErrorKind::MalformedOutcome,
            ErrorKind::OrderRejected,
        ]
        .iter()
        .map(|k| serde_json::to_value(k).unwrap().as_str().unwrap().to_string())
        .collect();

        assert_eq!(
            codes,
            vec![
                "MISSING_FIELD",
                "VALIDATION_ERROR",
                "CONNECTION_ERROR",
                "UPSTREAM_STATUS",
                "PARSE_ERROR",
                "MALFORMED_OUTCOME",
                "ORDER_REJECTED",
            ]
        );
    }

    #[test]
    fn parse_error_names_the_field() {
        let e = GatewayError::parse("unit_price", "missing");
        assert_eq!(e.kind(), ErrorKind::Parse);
        assert!(e.to_string().contains("unit_price"));
    }
}
