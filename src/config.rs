use std::{env, time::Duration};

use crate::errors::ConfigError;

/// Connection-establishment and response-read bounds for one class of call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl Timeouts {
    pub fn from_millis(connect: u64, read: u64) -> Self {
        Timeouts {
            connect: Duration::from_millis(connect),
            read: Duration::from_millis(read),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub name: String,
    pub base_url: String,
}

impl ServiceEndpoint {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        ServiceEndpoint {
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Joins `path` (which must start with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// The fixed set of backend services, in health-report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistry {
    pub orders: ServiceEndpoint,
    pub inventory: ServiceEndpoint,
    pub pricing: ServiceEndpoint,
    pub customers: ServiceEndpoint,
    pub notifications: ServiceEndpoint,
}

impl ServiceRegistry {
    pub fn entries(&self) -> Vec<ServiceEndpoint> {
        vec![
            self.orders.clone(),
            self.inventory.clone(),
            self.pricing.clone(),
            self.customers.clone(),
            self.notifications.clone(),
        ]
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        ServiceRegistry {
            orders: ServiceEndpoint::new("Order Service", "http://localhost:5001"),
            inventory: ServiceEndpoint::new("Inventory Service", "http://localhost:5002"),
            pricing: ServiceEndpoint::new("Pricing Service", "http://localhost:5003"),
            customers: ServiceEndpoint::new("Customer Service", "http://localhost:5004"),
            notifications: ServiceEndpoint::new("Notification Service", "http://localhost:5005"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub services: ServiceRegistry,
    pub query_timeouts: Timeouts,
    pub order_timeouts: Timeouts,
    pub probe_timeouts: Timeouts,
    pub log_path: Option<String>,
    pub log_level: tracing::Level,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            port: 8080,
            services: ServiceRegistry::default(),
            query_timeouts: Timeouts::from_millis(5_000, 5_000),
            order_timeouts: Timeouts::from_millis(60_000, 60_000),
            probe_timeouts: Timeouts::from_millis(5_000, 3_000),
            log_path: None,
            log_level: tracing::Level::DEBUG,
        }
    }
}

impl GatewayConfig {
    /// Reads the process environment; call `dotenv()` first to honour a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unset variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GatewayConfig::default();
        let registry = defaults.services;

        let service = |var: &str, fallback: ServiceEndpoint| -> Result<ServiceEndpoint, ConfigError> {
            match lookup(var) {
                Some(value) => {
                    let trimmed = value.trim();
                    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://"))
                        || trimmed.trim_end_matches('/').ends_with(':')
                    {
                        return Err(ConfigError::InvalidUrl {
                            var: var.to_string(),
                            value,
                        });
                    }
                    Ok(ServiceEndpoint::new(fallback.name, trimmed))
                }
                None => Ok(fallback),
            }
        };

        let millis = |var: &str, fallback: Duration| -> Result<u64, ConfigError> {
            match lookup(var) {
                Some(value) => match value.trim().parse::<u64>() {
                    Ok(ms) if ms > 0 => Ok(ms),
                    _ => Err(ConfigError::InvalidTimeout {
                        var: var.to_string(),
                        value,
                    }),
                },
                None => Ok(fallback.as_millis() as u64),
            }
        };

        let timeouts = |prefix: &str, fallback: Timeouts| -> Result<Timeouts, ConfigError> {
            Ok(Timeouts::from_millis(
                millis(&format!("{prefix}_CONNECT_TIMEOUT_MS"), fallback.connect)?,
                millis(&format!("{prefix}_READ_TIMEOUT_MS"), fallback.read)?,
            ))
        };

        let port = match lookup("AXUM_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort {
                    var: "AXUM_PORT".to_string(),
                    value: value.clone(),
                })?,
            None => defaults.port,
        };

        let log_level = lookup("LOG_LEVEL")
            .and_then(|level| level.trim().parse::<tracing::Level>().ok())
            .unwrap_or(defaults.log_level);

        Ok(GatewayConfig {
            port,
            services: ServiceRegistry {
                orders: service("ORDER_SERVICE_URL", registry.orders)?,
                inventory: service("INVENTORY_SERVICE_URL", registry.inventory)?,
                pricing: service("PRICING_SERVICE_URL", registry.pricing)?,
                customers: service("CUSTOMER_SERVICE_URL", registry.customers)?,
                notifications: service("NOTIFICATION_SERVICE_URL", registry.notifications)?,
            },
            query_timeouts: timeouts("QUERY", defaults.query_timeouts)?,
            order_timeouts: timeouts("ORDER", defaults.order_timeouts)?,
            probe_timeouts: timeouts("PROBE", defaults.probe_timeouts)?,
            log_path: lookup("LOG_PATH").filter(|p| !p.trim().is_empty()),
            log_level,
        })
    }
}
