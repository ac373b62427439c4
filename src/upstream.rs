use std::time::Instant;

use async_trait::async_trait;
use reqwest::{header, Method};
use tracing::{event, Level};

use crate::{config::Timeouts, errors::{ConfigError, GatewayError}};

/// Raw result of an upstream call: status plus undecoded body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}


/// A single outbound HTTP exchange with a backend service.
///
/// GET calls fail with [`GatewayError::UpstreamStatus`] on any non-2xx status.
/// POST calls hand back the body regardless of status so a structured error
/// from the service can be relayed to the caller.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn invoke(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<UpstreamResponse, GatewayError>;

    async fn get(&self, url: &str) -> Result<UpstreamResponse, GatewayError> {
        self.invoke(Method::GET, url, None).await
    }

    async fn post_json(&self, url: &str, body: String) -> Result<UpstreamResponse, GatewayError> {
        self.invoke(Method::POST, url, Some(body)).await
    }
}

#[derive(Clone, Debug)]
pub struct HttpUpstreamClient {
    client: reqwest::Client,
}

impl HttpUpstreamClient {
    pub fn new(timeouts: Timeouts) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeouts.connect)
            .read_timeout(timeouts.read)
            .build()?;

        Ok(HttpUpstreamClient { client })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn invoke(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<UpstreamResponse, GatewayError> {
        let started = Instant::now();
        let relay_error_body = method == Method::POST;

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(header::ACCEPT, "application/json");

        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        // The response (and its pooled connection) is dropped on every path out of here.
        let response = request.send().await.map_err(|e| {
            event!(Level::WARN, %method, url, error = %e, "upstream unreachable");
            GatewayError::Connection(e)
        })?;

        let status = response.status().as_u16();

        if !response.status().is_success() && !relay_error_body {
            event!(Level::WARN, %method, url, status, "upstream returned error status");
            return Err(GatewayError::UpstreamStatus { status });
        }

        let body = response.text().await.map_err(|e| {
            event!(Level::WARN, %method, url, status, error = %e, "failed reading upstream body");
            GatewayError::Connection(e)
        })?;

        event!(
            Level::DEBUG,
            %method,
            url,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "upstream call completed"
        );

        Ok(UpstreamResponse { status, body })
    }
}
