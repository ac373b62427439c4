//! Request-orchestration gateway between the storefront view layer and the
//! order, inventory, pricing, customer and notification services.

use std::sync::Arc;

use axum::{http::Method, routing::{get, post}, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod cqrs;
pub mod domain;
pub mod dtos;
pub mod errors;
pub mod health;
pub mod mapper;
pub mod routes;
pub mod state;
pub mod translator;
pub mod upstream;

use routes::{get_all_customers, get_products, get_profile, get_regions, index, not_found, submit_order, test_connection};
use state::AppState;

/// Every front-end route, without the metrics layer (the binary adds it).
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/getProducts", get(get_products))
        .route("/getProfile", get(get_profile))
        .route("/getAllCustomers", get(get_all_customers))
        .route("/getRegions", get(get_regions))
        .route("/submitOrder", post(submit_order))
        .route("/testConnection", get(test_connection))
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::very_permissive().allow_methods([Method::GET, Method::POST]))
        )
}
