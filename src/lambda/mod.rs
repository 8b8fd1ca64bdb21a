// src/lambda/mod.rs

//! AWS Lambda handler for the lookup.
//!
//! The trigger is an HTTP-style invocation (API Gateway / function URL). The
//! request body is ignored; every invocation runs the pipeline once and
//! answers with a proxy-integration response carrying the JSON body.

use lambda_runtime::{Error as LambdaError, LambdaEvent};

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::models::Config;
use crate::pipeline::{LookupResponse, handle_request};

/// Proxy-integration response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: ProxyHeaders,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct ProxyHeaders {
    #[serde(rename = "Content-Type")]
    pub content_type: &'static str,
}

impl From<&LookupResponse> for ProxyResponse {
    fn from(response: &LookupResponse) -> Self {
        Self {
            status_code: response.status,
            headers: ProxyHeaders {
                content_type: "application/json",
            },
            body: response.to_json(),
        }
    }
}

/// Main Lambda handler function.
#[instrument(skip(event, config))]
pub async fn handler(
    event: LambdaEvent<Value>,
    config: &Config,
) -> std::result::Result<ProxyResponse, LambdaError> {
    let start = std::time::Instant::now();
    info!("Lookup function triggered (request id {})", event.context.request_id);

    let response = handle_request(config).await;
    let elapsed = start.elapsed().as_millis() as u64;

    if response.is_success() {
        info!("Lookup completed in {}ms", elapsed);
    } else {
        error!("Lookup failed after {}ms: {}", elapsed, response.to_json());
    }

    Ok(ProxyResponse::from(&response))
}
