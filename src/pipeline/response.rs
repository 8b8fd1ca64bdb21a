// src/pipeline/response.rs

//! Response payloads returned to the HTTP caller.

use serde::Serialize;

use crate::error::AppError;

use super::run::{PipelineFailure, RunReport};

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

/// JSON body of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success {
        message: String,
        #[serde(rename = "outputFile")]
        output_file: String,
    },
    Failure {
        error: String,
    },
}

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl LookupResponse {
    pub fn success(report: &RunReport) -> Self {
        Self {
            status: STATUS_OK,
            body: ResponseBody::Success {
                message: "Lookup completed successfully".to_string(),
                output_file: report.output_file.clone(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Serialized body.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.body)
            .unwrap_or_else(|e| format!(r#"{{"error":"response serialization failed: {e}"}}"#))
    }
}

/// The single place where an error becomes a response.
///
/// Logs the error; failures from a pipeline run are already logged with
/// their stage and go through [`respond`] instead.
pub fn error_response(error: &AppError) -> LookupResponse {
    log::error!("Error in function execution ({:?}): {}", error.kind(), error);
    failure(error)
}

/// Map a finished run to its response.
pub fn respond(outcome: &std::result::Result<RunReport, PipelineFailure>) -> LookupResponse {
    match outcome {
        Ok(report) => LookupResponse::success(report),
        Err(run) => failure(&run.error),
    }
}

fn failure(error: &AppError) -> LookupResponse {
    LookupResponse {
        status: STATUS_ERROR,
        body: ResponseBody::Failure {
            error: error.to_string(),
        },
    }
}
