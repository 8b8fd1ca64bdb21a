//! AWS Lambda entry point for the nonprofit lookup.
//!
//! Deploy with `cargo lambda build --release --features lambda`.
//! Configuration is read once at cold start; a missing setting aborts
//! initialization before any request is served.

use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};

use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nonprofit_lookup::{config, lambda};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Nonprofit lookup function starting...");

    let settings = std::env::var("LOOKUP_SETTINGS_PATH").ok();
    let config = match config::load_from_env(settings.as_deref().map(std::path::Path::new)) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Startup configuration invalid: {}", e);
            return Err(e.into());
        }
    };

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let config = Arc::clone(&config);
        async move { lambda::handler(event, &config).await }
    }))
    .await
}
