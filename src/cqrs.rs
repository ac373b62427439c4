use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{event, Level};

use crate::{
    config::ServiceEndpoint,
    domain::{CustomerProfile, Product, ServiceHealthEntry},
    dtos::{Outcome, Response},
    errors::GatewayError,
    health::HealthAggregator,
    mapper::{map_customer, map_document, map_order_outcome, map_products},
    translator::{build_order_payload, parse_customer_id},
    upstream::UpstreamClient,
};

pub const INVENTORY_PATH: &str = "/inventory";
pub const REGIONS_PATH: &str = "/api/pricing/regions";
pub const ALL_CUSTOMERS_PATH: &str = "/api/customers/all";
pub const CUSTOMER_PATH: &str = "/api/customers";
pub const CREATE_ORDER_PATH: &str = "/api/orders/create";

// traits
pub trait Command{}
pub trait Query{}

/// Handlers never fail outright: every collaborator error is folded into the outcome.
pub trait CommandHandler<C: Command, R: Response>{
    async fn handle(&self, input: &C) -> Outcome<R>;
}

pub trait QueryHandler<Q: Query, R: Response>{
    async fn handle(&self, input: &Q) -> Outcome<R>;
}

#[derive(Serialize, Deserialize)]
pub struct ListProductsQuery{}
impl Query for ListProductsQuery{}

#[derive(Serialize, Deserialize)]
pub struct GetCustomerQuery {
    pub customer_id: Option<String>,
}
impl Query for GetCustomerQuery{}

#[derive(Serialize, Deserialize)]
pub struct ListCustomersQuery{}
impl Query for ListCustomersQuery{}

#[derive(Serialize, Deserialize)]
pub struct ListRegionsQuery{}
impl Query for ListRegionsQuery{}

#[derive(Serialize, Deserialize)]
pub struct CheckServicesQuery{}
impl Query for CheckServicesQuery{}

/// Raw checkout form fields; validation happens in the translator.
#[derive(Default, Serialize, Deserialize)]
pub struct SubmitOrderCommand {
    pub customer_id: Option<String>,
    pub product_ids: Option<String>,
    pub quantities: Option<String>,
}
impl Command for SubmitOrderCommand{}

impl SubmitOrderCommand {
    /// Fields set here win; unset ones are taken from `fallback`.
    pub fn or(self, fallback: SubmitOrderCommand) -> Self {
        SubmitOrderCommand {
            customer_id: self.customer_id.or(fallback.customer_id),
            product_ids: self.product_ids.or(fallback.product_ids),
            quantities: self.quantities.or(fallback.quantities),
        }
    }
}

async fn fetch<U: UpstreamClient>(upstream: &U, service: &ServiceEndpoint, path: &str) -> Result<String, GatewayError> {
    let response = upstream.get(&service.url(path)).await?;
    Ok(response.body)
}

fn fold<R: Response>(result: Result<R, GatewayError>, service: &ServiceEndpoint, action: &str) -> Outcome<R> {
    match result {
        Ok(payload) => Outcome::ok(payload),
        Err(e) => {
            event!(Level::WARN, "Error occurred while {}: {}", action, e);
            Outcome::from_error(&e, &service.name)
        }
    }
}

pub struct ListProductsQueryHandler<U: UpstreamClient>{
    upstream: Arc<U>,
    inventory: ServiceEndpoint,
}

impl<U: UpstreamClient> ListProductsQueryHandler<U>{
    pub fn new(upstream: Arc<U>, inventory: ServiceEndpoint) -> Self{
        ListProductsQueryHandler {
            upstream,
            inventory,
        }
    }
}

impl<U: UpstreamClient> QueryHandler<ListProductsQuery, Vec<Product>> for ListProductsQueryHandler<U>{
    async fn handle(&self, _input: &ListProductsQuery) -> Outcome<Vec<Product>> {
        let result = match fetch(self.upstream.as_ref(), &self.inventory, INVENTORY_PATH).await {
            Ok(body) => map_products(&body),
            Err(e) => Err(e),
        };

        if let Ok(products) = &result {
            event!(Level::DEBUG, count = products.len(), "listed products");
        }

        fold(result, &self.inventory, "listing products")
    }
}

pub struct GetCustomerQueryHandler<U: UpstreamClient>{
    upstream: Arc<U>,
    customers: ServiceEndpoint,
}

impl<U: UpstreamClient> GetCustomerQueryHandler<U>{
    pub fn new(upstream: Arc<U>, customers: ServiceEndpoint) -> Self{
        GetCustomerQueryHandler {
            upstream,
            customers,
        }
    }
}

impl<U: UpstreamClient> QueryHandler<GetCustomerQuery, CustomerProfile> for GetCustomerQueryHandler<U>{
    async fn handle(&self, input: &GetCustomerQuery) -> Outcome<CustomerProfile> {
        let customer_id = match parse_customer_id(input.customer_id.as_deref()) {
            Ok(id) => id,
            Err(e) => {
                event!(Level::WARN, "Invalid customer ID: {}", e);
                return Outcome::failed(e.kind(), "Invalid customer ID");
            }
        };

        let path = format!("{}/{}", CUSTOMER_PATH, customer_id);
        let result = match fetch(self.upstream.as_ref(), &self.customers, &path).await {
            Ok(body) => map_customer(&body),
            Err(e) => Err(e),
        };

        fold(result, &self.customers, "fetching customer")
    }
}

pub struct ListCustomersQueryHandler<U: UpstreamClient>{
    upstream: Arc<U>,
    customers: ServiceEndpoint,
}

impl<U: UpstreamClient> ListCustomersQueryHandler<U>{
    pub fn new(upstream: Arc<U>, customers: ServiceEndpoint) -> Self{
        ListCustomersQueryHandler {
            upstream,
            customers,
        }
    }
}

impl<U: UpstreamClient> QueryHandler<ListCustomersQuery, Value> for ListCustomersQueryHandler<U>{
    async fn handle(&self, _input: &ListCustomersQuery) -> Outcome<Value> {
        let result = match fetch(self.upstream.as_ref(), &self.customers, ALL_CUSTOMERS_PATH).await {
            Ok(body) => map_document(&body),
            Err(e) => Err(e),
        };

        fold(result, &self.customers, "listing customers")
    }
}

pub struct ListRegionsQueryHandler<U: UpstreamClient>{
    upstream: Arc<U>,
    pricing: ServiceEndpoint,
}

impl<U: UpstreamClient> ListRegionsQueryHandler<U>{
    pub fn new(upstream: Arc<U>, pricing: ServiceEndpoint) -> Self{
        ListRegionsQueryHandler {
            upstream,
            pricing,
        }
    }
}

impl<U: UpstreamClient> QueryHandler<ListRegionsQuery, Value> for ListRegionsQueryHandler<U>{
    async fn handle(&self, _input: &ListRegionsQuery) -> Outcome<Value> {
        let result = match fetch(self.upstream.as_ref(), &self.pricing, REGIONS_PATH).await {
            Ok(body) => map_document(&body),
            Err(e) => Err(e),
        };

        fold(result, &self.pricing, "listing regions")
    }
}

pub struct SubmitOrderCommandHandler<U: UpstreamClient>{
    upstream: Arc<U>,
    orders: ServiceEndpoint,
}

impl<U: UpstreamClient> SubmitOrderCommandHandler<U>{
    pub fn new(upstream: Arc<U>, orders: ServiceEndpoint) -> Self{
        SubmitOrderCommandHandler {
            upstream,
            orders,
        }
    }

    async fn submit(&self, input: &SubmitOrderCommand) -> Result<Outcome<Map<String, Value>>, GatewayError> {
        let order = build_order_payload(
            input.customer_id.as_deref(),
            input.product_ids.as_deref(),
            input.quantities.as_deref(),
        )?;

        event!(Level::INFO, customer_id = order.customer_id, lines = order.lines.len(), "submitting order");

        let payload = serde_json::to_string(&order)?;
        let response = self.upstream.post_json(&self.orders.url(CREATE_ORDER_PATH), payload).await?;

        let outcome = map_order_outcome(&response.body);
        match &outcome.error_message {
            Some(message) => event!(Level::WARN, status = response.status, "Order failed: {}", message),
            None => event!(Level::INFO, status = response.status, "Order created"),
        }

        Ok(outcome.into())
    }
}

impl<U: UpstreamClient> CommandHandler<SubmitOrderCommand, Map<String, Value>> for SubmitOrderCommandHandler<U>{
    async fn handle(&self, input: &SubmitOrderCommand) -> Outcome<Map<String, Value>> {
        match self.submit(input).await {
            Ok(outcome) => outcome,
            Err(e) => {
                event!(Level::WARN, "Error occurred while submitting order: {}", e);
                Outcome::from_error(&e, &self.orders.name)
            }
        }
    }
}

pub struct CheckServicesQueryHandler<U: UpstreamClient>{
    aggregator: HealthAggregator<U>,
}

impl<U: UpstreamClient> CheckServicesQueryHandler<U>{
    pub fn new(aggregator: HealthAggregator<U>) -> Self{
        CheckServicesQueryHandler {
            aggregator
        }
    }
}

impl<U: UpstreamClient> QueryHandler<CheckServicesQuery, Vec<ServiceHealthEntry>> for CheckServicesQueryHandler<U>{
    async fn handle(&self, _input: &CheckServicesQuery) -> Outcome<Vec<ServiceHealthEntry>> {
        Outcome::ok(self.aggregator.check_all().await)
    }
}
