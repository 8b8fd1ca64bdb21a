// src/services/writer.rs

//! Output table accumulation and CSV serialization.

use crate::error::{AppError, Result};
use crate::models::{OutputRow, OutputTable};

/// Collects enriched rows in input order.
#[derive(Debug, Default)]
pub struct ResultWriter {
    rows: Vec<OutputRow>,
}

impl ResultWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table in one go.
    pub fn build(header: OutputRow, rows: impl IntoIterator<Item = OutputRow>) -> OutputTable {
        OutputTable::new(header, rows)
    }

    pub fn push(&mut self, row: OutputRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finish with the fixed header in front.
    pub fn finish(self) -> OutputTable {
        Self::build(OutputRow::header(), self.rows)
    }
}

/// Serialize a table as UTF-8 CSV with CRLF line endings.
///
/// Fields are quoted only when they contain a comma, quote or line break.
pub fn serialize(table: &OutputTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    for row in table.rows() {
        writer.write_record(row.fields())?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}
