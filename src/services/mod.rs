//! Service layer for the lookup pipeline.
//!
//! This module contains the business logic for:
//! - Reading the input table (`RecordSource`)
//! - Looking up phone and website (`LookupClient`)
//! - Building and serializing the output (`ResultWriter`)
//! - Persisting the artifact (`ResultSink`)

mod lookup;
mod sink;
mod source;
pub mod writer;

pub use lookup::{Enricher, LookupClient, LookupOutcome};
pub use sink::{CSV_CONTENT_TYPE, ResultSink};
pub use source::{InputFormat, RecordSource};
pub use writer::ResultWriter;
