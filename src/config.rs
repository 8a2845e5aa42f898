use std::env;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub table_name: String,
    pub endpoint_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let table_name = env::var("DYNAMODB_TABLE")
            .context("DYNAMODB_TABLE environment variable is required")?;

        // Applied when the SDK client is built; also gates table bootstrap.
        let endpoint_url = env::var("AWS_ENDPOINT_URL").ok();

        Ok(Config {
            table_name,
            endpoint_url,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  DynamoDB table: {}", self.table_name);
        tracing::info!("  Endpoint override: {}",
            self.endpoint_url.as_deref().unwrap_or("disabled (using AWS)"));
    }
}
