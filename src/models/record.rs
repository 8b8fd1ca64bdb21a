//! Input-side records: raw sheet rows and lookup candidates.

/// Column holding the organisation name.
pub const NAME_COLUMN: usize = 0;

/// Column holding the city ("Ort").
pub const CITY_COLUMN: usize = 2;

/// One line of the input table, cells rendered as text.
///
/// Absent trailing cells are simply missing from `cells`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    pub cells: Vec<String>,
}

impl SourceRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Cell text at `index`, or `None` if the cell is absent or empty.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells
            .get(index)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl<S: Into<String>> FromIterator<S> for SourceRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// An organisation that qualifies for enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub location_hint: String,
}

impl Candidate {
    /// Build a candidate from a row; `None` when the name cell is empty.
    pub fn from_row(row: &SourceRow) -> Option<Self> {
        let name = row.cell(NAME_COLUMN)?;
        // A missing city is an empty hint, never the text "None"
        Some(Self {
            name: name.to_string(),
            location_hint: row.cell(CITY_COLUMN).unwrap_or_default().to_string(),
        })
    }

    /// Free-text search query: name and city joined by a single space.
    pub fn query(&self) -> String {
        format!("{} {}", self.name, self.location_hint)
    }
}
