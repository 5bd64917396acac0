pub mod columns;
pub mod delivery;
pub(crate) mod input;
pub mod ledger;
pub(crate) mod parse;
pub mod payments;
pub mod production;

use crate::billing::normalize::header_key;

/// Form-submission stamp column dropped from every source before normalization.
pub const FORM_TIMESTAMP_COLUMN: &str = "Timestamp";

/// In-memory table as loaded from a source: a header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|value| value.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|value| value.to_string()).collect())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Cell text, or `""` for ragged rows.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn column_cells(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, column))
    }

    /// Trimmed, lowercased header names in column order.
    pub fn header_keys(&self) -> Vec<String> {
        self.headers.iter().map(|value| header_key(value)).collect()
    }

    /// Copy of the table without the named columns (exact header match).
    pub fn without_columns(&self, names: &[&str]) -> Self {
        let keep = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !names.iter().any(|name| header.trim() == *name))
            .map(|(index, _)| index)
            .collect::<Vec<usize>>();

        if keep.len() == self.headers.len() {
            return self.clone();
        }

        Self {
            headers: keep.iter().map(|index| self.headers[*index].clone()).collect(),
            rows: (0..self.rows.len())
                .map(|row| {
                    keep.iter()
                        .map(|column| self.cell(row, *column).to_string())
                        .collect()
                })
                .collect(),
        }
    }
}

/// Shape of a distribution table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableLayout {
    /// One row per delivery with customer, date, and quantity columns.
    #[default]
    Long,
    /// One row per date with one quantity column per customer.
    Wide,
}
