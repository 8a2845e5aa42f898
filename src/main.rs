mod config;
mod dynamo;
mod error;
mod handlers;
mod models;
mod response;
mod state;

use lambda_http::{Error, run, service_fn};

use config::Config;
use dynamo::DynamoStore;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if present (for local development)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("items-rest-api starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = DynamoStore::from_config(&config).await?;
    let state = AppState {
        store,
        table_name: config.table_name,
    };

    run(service_fn(|event| handlers::handle_event(&state, event))).await
}
