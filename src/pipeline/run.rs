// src/pipeline/run.rs

//! One enrichment run: fetch → parse → enrich → serialize → upload.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{Config, OutputRow};
use crate::services::{Enricher, InputFormat, RecordSource, ResultSink, ResultWriter, writer};
use crate::storage::BlobStore;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Fetching,
    Parsing,
    Enriching,
    Serializing,
    Uploading,
    Succeeded,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Enriching => "enriching",
            Self::Serializing => "serializing",
            Self::Uploading => "uploading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Name of the uploaded artifact
    pub output_file: String,
    /// Organisations looked up (data rows written)
    pub processed: usize,
    /// Rows left with neither phone nor website
    pub degraded: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// A run that ended in `Failed`, with the stage it failed in.
#[derive(Debug)]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    pub error: AppError,
}

/// Drives a single invocation through its stages.
pub struct LookupPipeline<'a> {
    config: &'a Config,
    store: &'a dyn BlobStore,
    enricher: &'a dyn Enricher,
    stage: PipelineStage,
}

impl<'a> LookupPipeline<'a> {
    pub fn new(config: &'a Config, store: &'a dyn BlobStore, enricher: &'a dyn Enricher) -> Self {
        Self {
            config,
            store,
            enricher,
            stage: PipelineStage::Idle,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Execute all stages. Any error moves the run straight to `Failed`.
    pub async fn run(&mut self) -> std::result::Result<RunReport, PipelineFailure> {
        match self.execute().await {
            Ok(report) => {
                self.advance(PipelineStage::Succeeded);
                Ok(report)
            }
            Err(error) => {
                let stage = self.stage;
                log::error!("Run failed while {}: {}", stage, error);
                self.stage = PipelineStage::Failed;
                Err(PipelineFailure { stage, error })
            }
        }
    }

    fn advance(&mut self, next: PipelineStage) {
        log::info!("Pipeline stage: {} -> {}", self.stage, next);
        self.stage = next;
    }

    async fn execute(&mut self) -> Result<RunReport> {
        let started_at = Utc::now();
        let (config, store, enricher) = (self.config, self.store, self.enricher);
        let storage = &config.storage;
        let output_file = config.pipeline.output_file.as_str();

        self.advance(PipelineStage::Fetching);
        let input = store
            .read_bytes(&storage.container, &storage.input_file)
            .await?;

        self.advance(PipelineStage::Parsing);
        let source = RecordSource::new(config.pipeline.max_rows);
        let rows = source.load(input, InputFormat::from_name(&storage.input_file))?;
        let candidates = source.candidates(&rows);
        drop(rows);
        log::info!("Selected {} organisations for lookup", candidates.len());

        self.advance(PipelineStage::Enriching);
        let mut results = ResultWriter::new();
        let mut degraded = 0;
        for (index, candidate) in candidates.into_iter().enumerate() {
            let result = enricher.lookup(&candidate).await;
            if result.is_empty() {
                degraded += 1;
            }
            log::debug!("[{}] {} -> {:?}", index + 1, candidate.name, result);
            results.push(OutputRow::enriched(candidate.name, result));
        }
        let processed = results.len();

        self.advance(PipelineStage::Serializing);
        let bytes = writer::serialize(&results.finish())?;

        self.advance(PipelineStage::Uploading);
        ResultSink::new(store, &storage.container)
            .store(output_file, &bytes)
            .await?;

        let report = RunReport {
            output_file: output_file.to_string(),
            processed,
            degraded,
            started_at,
            finished_at: Utc::now(),
        };
        log::info!(
            "Lookup complete: {} organisations, {} without data, {}ms",
            report.processed,
            report.degraded,
            report.elapsed_ms()
        );
        Ok(report)
    }
}
