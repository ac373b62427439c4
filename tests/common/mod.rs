#![allow(dead_code)]

use axum::{body::Body, http::Request, response::Response, Router};
use eshop_gateway::config::{GatewayConfig, ServiceEndpoint, ServiceRegistry, Timeouts};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Serves `router` on an ephemeral loopback port and returns its base URL.
pub async fn spawn_service(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A loopback URL nothing listens on, so connections are refused.
pub async fn closed_service_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn short_timeouts() -> Timeouts {
    Timeouts::from_millis(1_000, 1_000)
}

pub struct ServiceUrls {
    pub orders: String,
    pub inventory: String,
    pub pricing: String,
    pub customers: String,
    pub notifications: String,
}

pub fn test_config(urls: ServiceUrls) -> GatewayConfig {
    GatewayConfig {
        services: ServiceRegistry {
            orders: ServiceEndpoint::new("Order Service", urls.orders),
            inventory: ServiceEndpoint::new("Inventory Service", urls.inventory),
            pricing: ServiceEndpoint::new("Pricing Service", urls.pricing),
            customers: ServiceEndpoint::new("Customer Service", urls.customers),
            notifications: ServiceEndpoint::new("Notification Service", urls.notifications),
        },
        query_timeouts: short_timeouts(),
        order_timeouts: short_timeouts(),
        probe_timeouts: short_timeouts(),
        ..GatewayConfig::default()
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_form(app: Router, uri: &str, form: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
