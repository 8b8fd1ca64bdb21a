//! Output-side records: lookup results and the CSV table.

/// Fixed header of every output table.
pub const OUTPUT_HEADER: [&str; 3] = ["Organisation", "Phone", "Website"];

/// Phone and website found for one organisation.
///
/// Empty fields mean "no match" or "lookup failed"; the two are not
/// distinguished downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentResult {
    pub phone: String,
    pub website: String,
}

impl EnrichmentResult {
    pub fn is_empty(&self) -> bool {
        self.phone.is_empty() && self.website.is_empty()
    }
}

/// One line of the output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub organisation: String,
    pub phone: String,
    pub website: String,
}

impl OutputRow {
    pub fn header() -> Self {
        let [organisation, phone, website] = OUTPUT_HEADER;
        Self {
            organisation: organisation.to_string(),
            phone: phone.to_string(),
            website: website.to_string(),
        }
    }

    pub fn enriched(organisation: impl Into<String>, result: EnrichmentResult) -> Self {
        Self {
            organisation: organisation.into(),
            phone: result.phone,
            website: result.website,
        }
    }

    pub fn fields(&self) -> [&str; 3] {
        [&self.organisation, &self.phone, &self.website]
    }
}

/// Ordered output rows; the header is always the first row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    rows: Vec<OutputRow>,
}

impl OutputTable {
    /// Header followed by the given rows, in order.
    pub fn new(header: OutputRow, rows: impl IntoIterator<Item = OutputRow>) -> Self {
        let mut all = vec![header];
        all.extend(rows);
        Self { rows: all }
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }
}
