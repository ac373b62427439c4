use std::sync::Arc;

use crate::{
    config::GatewayConfig,
    cqrs::{
        CheckServicesQueryHandler, GetCustomerQueryHandler, ListCustomersQueryHandler,
        ListProductsQueryHandler, ListRegionsQueryHandler, SubmitOrderCommandHandler,
    },
    errors::ConfigError,
    health::HealthAggregator,
    upstream::HttpUpstreamClient,
};

#[derive(Clone)]
pub struct AppState {
    pub list_products_query_handler: Arc<ListProductsQueryHandler<HttpUpstreamClient>>,
    pub get_customer_query_handler: Arc<GetCustomerQueryHandler<HttpUpstreamClient>>,
    pub list_customers_query_handler: Arc<ListCustomersQueryHandler<HttpUpstreamClient>>,
    pub list_regions_query_handler: Arc<ListRegionsQueryHandler<HttpUpstreamClient>>,
    pub submit_order_command_handler: Arc<SubmitOrderCommandHandler<HttpUpstreamClient>>,
    pub check_services_query_handler: Arc<CheckServicesQueryHandler<HttpUpstreamClient>>,
}

impl AppState {
    /// Wires every handler to its service, one HTTP client per timeout profile.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let query_client = Arc::new(HttpUpstreamClient::new(config.query_timeouts)?);
        let order_client = Arc::new(HttpUpstreamClient::new(config.order_timeouts)?);
        let probe_client = Arc::new(HttpUpstreamClient::new(config.probe_timeouts)?);
        let services = &config.services;

        Ok(AppState {
            list_products_query_handler: Arc::new(ListProductsQueryHandler::new(query_client.clone(), services.inventory.clone())),
            get_customer_query_handler: Arc::new(GetCustomerQueryHandler::new(query_client.clone(), services.customers.clone())),
            list_customers_query_handler: Arc::new(ListCustomersQueryHandler::new(query_client.clone(), services.customers.clone())),
            list_regions_query_handler: Arc::new(ListRegionsQueryHandler::new(query_client, services.pricing.clone())),
            submit_order_command_handler: Arc::new(SubmitOrderCommandHandler::new(order_client, services.orders.clone())),
            check_services_query_handler: Arc::new(CheckServicesQueryHandler::new(HealthAggregator::new(probe_client, services.entries()))),
        })
    }
}
