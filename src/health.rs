use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{event, Level};

use crate::{
    config::ServiceEndpoint,
    domain::{HealthStatus, ServiceHealthEntry},
    errors::GatewayError,
    upstream::UpstreamClient,
};

pub const HEALTH_PATH: &str = "/api/health";

/// Probes every registered service's health endpoint.
///
/// Probes run concurrently; the report comes back in registry order.
pub struct HealthAggregator<U: UpstreamClient> {
    upstream: Arc<U>,
    registry: Vec<ServiceEndpoint>,
}

impl<U: UpstreamClient> HealthAggregator<U> {
    pub fn new(upstream: Arc<U>, registry: Vec<ServiceEndpoint>) -> Self {
        HealthAggregator { upstream, registry }
    }

    pub async fn check_all(&self) -> Vec<ServiceHealthEntry> {
        join_all(self.registry.iter().map(|service| self.probe(service))).await
    }

    async fn probe(&self, service: &ServiceEndpoint) -> ServiceHealthEntry {
        let url = service.url(HEALTH_PATH);

        let (status, detail) = match self.upstream.get(&url).await {
            Ok(response) if response.status == 200 => (HealthStatus::Online, response.body),
            Ok(response) => (HealthStatus::Offline, format!("Status: {}", response.status)),
            Err(GatewayError::UpstreamStatus { status }) => (HealthStatus::Offline, format!("Status: {status}")),
            Err(e) => (HealthStatus::Offline, e.to_string()),
        };

        if status == HealthStatus::Offline {
            event!(Level::WARN, service = %service.name, url = %url, detail = %detail, "service offline");
        }

        ServiceHealthEntry {
            name: service.name.clone(),
            url,
            status,
            detail,
        }
    }
}
