// src/services/source.rs

//! Input table reader.
//!
//! Turns the downloaded blob into rows and selects the organisations that
//! will be looked up.
//!
//! For workbooks the first visible worksheet is read. The saved active-sheet
//! marker is ignored, so hidden leading sheets are skipped.

use std::io::Cursor;

use calamine::{Data, Reader, SheetType, SheetVisible, open_workbook_auto_from_rs};

use crate::error::{AppError, Result};
use crate::models::{Candidate, SourceRow};

/// How the input blob is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// xlsx / xlsm / xlsb / xls / ods workbook; the first visible worksheet is read
    Spreadsheet,
    /// Comma-separated text
    DelimitedText,
}

impl InputFormat {
    /// Pick the format from the blob name.
    pub fn from_name(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(".csv") {
            Self::DelimitedText
        } else {
            Self::Spreadsheet
        }
    }
}

/// Reads the input table and yields lookup candidates.
#[derive(Debug, Clone)]
pub struct RecordSource {
    max_rows: usize,
}

impl RecordSource {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }

    /// Parse the blob into rows. Row 0 is the sheet's first row.
    pub fn load(&self, bytes: Vec<u8>, format: InputFormat) -> Result<Vec<SourceRow>> {
        match format {
            InputFormat::Spreadsheet => read_workbook(bytes),
            InputFormat::DelimitedText => read_delimited(&bytes),
        }
    }

    /// Candidates in input order.
    ///
    /// The header row is skipped. Rows without a name are skipped and do not
    /// count toward the `max_rows` cap.
    pub fn candidates(&self, rows: &[SourceRow]) -> Vec<Candidate> {
        rows.iter()
            .skip(1)
            .filter_map(Candidate::from_row)
            .take(self.max_rows)
            .collect()
    }
}

fn read_workbook(bytes: Vec<u8>) -> Result<Vec<SourceRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(AppError::parse)?;
    let sheet = workbook
        .sheets_metadata()
        .iter()
        .find(|sheet| sheet.typ == SheetType::WorkSheet && sheet.visible == SheetVisible::Visible)
        .map(|sheet| sheet.name.clone())
        .ok_or_else(|| AppError::parse("workbook contains no visible worksheet"))?;
    let range = workbook.worksheet_range(&sheet).map_err(AppError::parse)?;
    log::debug!("Reading worksheet '{}'", sheet);

    // calamine trims leading empty rows/columns; restore absolute positions
    let Some((first_row, first_col)) = range.start() else {
        return Ok(Vec::new());
    };

    let mut rows: Vec<SourceRow> = (0..first_row).map(|_| SourceRow::default()).collect();
    for cells in range.rows() {
        let mut row = vec![String::new(); first_col as usize];
        row.extend(cells.iter().map(cell_text));
        rows.push(SourceRow::new(row));
    }

    log::debug!("Parsed {} worksheet rows", rows.len());
    Ok(rows)
}

fn read_delimited(bytes: &[u8]) -> Result<Vec<SourceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(AppError::parse)?;
        rows.push(record.iter().collect());
    }

    log::debug!("Parsed {} delimited rows", rows.len());
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::DateTime(dt) if dt.is_datetime() => dt
            .as_datetime()
            .map(|value| value.to_string())
            .unwrap_or_else(|| dt.to_string()),
        other => other.to_string(),
    }
}
