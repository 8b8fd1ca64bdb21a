// src/lib.rs

//! Nonprofit lookup library
//!
//! Reads an organisation spreadsheet from blob storage, looks up phone and
//! website for each organisation and writes the results back as CSV.

pub mod config;
pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
