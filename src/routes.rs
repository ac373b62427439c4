use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Form, Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{event, Level};

use crate::{
    cqrs::{
        CheckServicesQuery, CommandHandler, GetCustomerQuery, ListCustomersQuery, ListProductsQuery,
        ListRegionsQuery, QueryHandler, SubmitOrderCommand,
    },
    dtos::Outcome,
    errors::ErrorKind,
    state::AppState,
};

pub async fn index() -> &'static str {
    "eshop gateway"
}

pub async fn get_products(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    render(state.list_products_query_handler.handle(&ListProductsQuery{}).await)
}

pub async fn get_profile(State(state): State<Arc<AppState>>, query: Result<Query<GetCustomerQuery>, QueryRejection>) -> (StatusCode, Json<Value>) {
    match query {
        Ok(Query(query)) => render(state.get_customer_query_handler.handle(&query).await),
        Err(rejection) => render(Outcome::<Map<String, Value>>::failed(ErrorKind::Validation, rejection.body_text())),
    }
}

pub async fn get_all_customers(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    render(state.list_customers_query_handler.handle(&ListCustomersQuery{}).await)
}

pub async fn get_regions(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    render(state.list_regions_query_handler.handle(&ListRegionsQuery{}).await)
}

/// Checkout fields may arrive as a urlencoded body, as query parameters, or both;
/// body fields win.
pub async fn submit_order(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SubmitOrderCommand>, QueryRejection>,
    form: Result<Form<SubmitOrderCommand>, FormRejection>,
) -> (StatusCode, Json<Value>) {
    let from_query = match query {
        Ok(Query(command)) => command,
        Err(rejection) => return reject(rejection.body_text()),
    };
    let from_body = match form {
        Ok(Form(command)) => command,
        Err(FormRejection::InvalidFormContentType(_)) => SubmitOrderCommand::default(),
        Err(rejection) => return reject(rejection.body_text()),
    };

    let submit_order_command = from_body.or(from_query);
    render(state.submit_order_command_handler.handle(&submit_order_command).await)
}

fn reject(message: String) -> (StatusCode, Json<Value>) {
    event!(Level::WARN, "Rejected order request: {}", message);
    render(Outcome::<Map<String, Value>>::failed(ErrorKind::Validation, message))
}

pub async fn test_connection(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    render(state.check_services_query_handler.handle(&CheckServicesQuery{}).await)
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    let outcome: Outcome<Value> = Outcome {
        success: false,
        payload: None,
        error_message: Some(String::from("Not found")),
        code: None,
    };
    (StatusCode::NOT_FOUND, Json(json!(outcome)))
}

/// Hands the outcome to the view layer as JSON; the status mirrors the failure kind.
pub fn render<T: Serialize>(outcome: Outcome<T>) -> (StatusCode, Json<Value>) {
    let status = match outcome.code {
        None => StatusCode::OK,
        Some(ErrorKind::MissingField | ErrorKind::Validation) => StatusCode::BAD_REQUEST,
        Some(ErrorKind::OrderRejected) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(ErrorKind::Connection | ErrorKind::UpstreamStatus | ErrorKind::Parse | ErrorKind::MalformedOutcome) => StatusCode::BAD_GATEWAY,
    };
    (status, Json(json!(outcome)))
}
