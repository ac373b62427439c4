use std::{process::ExitCode, sync::{Arc, Mutex}};

use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use dotenv::dotenv;
use eshop_gateway::{config::GatewayConfig, router, state::AppState};
use tracing::{event, Level};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let subscriber = tracing_subscriber::
    fmt()
    .with_max_level(config.log_level)
    .with_target(false)
    .with_ansi(false)
    .json()
    .with_file(true)
    .with_line_number(true)
    .with_current_span(true);

    match &config.log_path {
        Some(path) => match std::fs::File::create(path) {
            Ok(file) => subscriber.with_writer(Mutex::new(file)).init(),
            Err(e) => {
                eprintln!("cannot open log file {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => subscriber.init(),
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            event!(Level::ERROR, "gateway stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::from_config(&config)?);

    let (prometheus_layer, metrics_handle) = PrometheusMetricLayer::pair();

    let app = router(state)
        .route("/metrics", get(|| async move {metrics_handle.render()}))
        .layer(prometheus_layer);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    event!(Level::INFO, port = config.port, services = ?config.services.entries(), "gateway listening");

    axum::serve(listener, app).await?;

    Ok(())
}
