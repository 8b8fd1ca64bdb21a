// src/models/mod.rs

//! Domain models for the lookup pipeline.
//!
//! Input rows and candidates, lookup results and the output table, and the
//! application configuration.

mod config;
mod output;
mod record;

// Re-export all public types
pub use config::{Config, LookupConfig, PipelineConfig, StorageConfig};
pub use output::{EnrichmentResult, OUTPUT_HEADER, OutputRow, OutputTable};
pub use record::{CITY_COLUMN, Candidate, NAME_COLUMN, SourceRow};
