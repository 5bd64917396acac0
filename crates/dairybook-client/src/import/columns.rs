//! Heuristic column resolution for loosely-shaped tables.
//!
//! Candidate lists are ordered: the first candidate present wins, regardless of
//! where the column sits in the table. Existing spreadsheets rely on this order
//! to break ties, so keep it stable.

use crate::import::RawTable;

pub const DELIVERY_CUSTOMER_CANDIDATES: [&str; 5] = ["customer_id", "customer", "cust_id", "cust", "id"];
pub const DELIVERY_DATE_CANDIDATES: [&str; 4] = ["date", "day", "timestamp", "ts"];
pub const DELIVERY_QUANTITY_CANDIDATES: [&str; 5] = ["litres", "liters", "qty", "quantity", "milk"];

pub const PAYMENT_CUSTOMER_CANDIDATES: [&str; 4] = ["customer_id", "customer", "cust_id", "cust"];
pub const PAYMENT_AMOUNT_CANDIDATES: [&str; 4] = ["amount", "amt", "payment", "paid"];
pub const PAYMENT_DATE_CANDIDATES: [&str; 4] = ["date", "payment_date", "timestamp", "ts"];

/// Index of the first candidate (in candidate order) present among `header_keys`.
pub fn find_candidate(header_keys: &[String], candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        header_keys
            .iter()
            .position(|header| header.as_str() == *candidate)
    })
}

/// First header containing `needle`, skipping `excluded` columns.
pub fn find_containing(header_keys: &[String], needle: &str, excluded: &[usize]) -> Option<usize> {
    header_keys
        .iter()
        .enumerate()
        .find(|(index, header)| !excluded.contains(index) && header.contains(needle))
        .map(|(index, _)| index)
}

/// A column is numeric when the table has rows and every non-blank cell parses
/// as a number. All-blank columns count as numeric.
pub fn is_numeric_column(table: &RawTable, column: usize) -> bool {
    if table.rows.is_empty() || column >= table.column_count() {
        return false;
    }
    table.column_cells(column).all(|cell| {
        let trimmed = cell.trim();
        trimmed.is_empty() || trimmed.parse::<f64>().is_ok()
    })
}

pub fn first_numeric_column(table: &RawTable, excluded: &[usize]) -> Option<usize> {
    (0..table.column_count())
        .filter(|index| !excluded.contains(index))
        .find(|index| is_numeric_column(table, *index))
}

/// Numeric coercion for quantity and amount cells: unparseable or non-finite
/// values become `0.0`.
pub fn coerce_number(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
