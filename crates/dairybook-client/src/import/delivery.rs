use tracing::debug;

use crate::billing::date::parse_table_date;
use crate::billing::types::{DeliveryRecord, Shift};
use crate::import::columns::{
    DELIVERY_CUSTOMER_CANDIDATES, DELIVERY_DATE_CANDIDATES, DELIVERY_QUANTITY_CANDIDATES,
    coerce_number, find_candidate, find_containing, first_numeric_column,
};
use crate::import::{RawTable, TableLayout};

/// Columns chosen for a long-format distribution table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryColumns {
    pub customer: usize,
    pub date: Option<usize>,
    /// `None` means the table has no quantity column and every row reads as 0.
    pub quantity: Option<usize>,
}

pub fn detect_delivery_columns(table: &RawTable) -> Option<DeliveryColumns> {
    if table.column_count() == 0 {
        return None;
    }
    let header_keys = table.header_keys();

    let customer = find_candidate(&header_keys, &DELIVERY_CUSTOMER_CANDIDATES).unwrap_or(0);

    let date = find_candidate(&header_keys, &DELIVERY_DATE_CANDIDATES)
        .or_else(|| find_containing(&header_keys, "date", &[]))
        .or_else(|| (table.column_count() > 1).then_some(1));

    let mut claimed = vec![customer];
    if let Some(date_index) = date {
        claimed.push(date_index);
    }
    let quantity = find_candidate(&header_keys, &DELIVERY_QUANTITY_CANDIDATES)
        .or_else(|| first_numeric_column(table, &claimed));

    Some(DeliveryColumns {
        customer,
        date,
        quantity,
    })
}

pub fn normalize_distribution(table: &RawTable, shift: Shift, layout: TableLayout) -> Vec<DeliveryRecord> {
    match layout {
        TableLayout::Long => normalize_deliveries(table, shift),
        TableLayout::Wide => normalize_wide_deliveries(table, shift),
    }
}

/// Long format: one [`DeliveryRecord`] per row whose date parses.
pub fn normalize_deliveries(table: &RawTable, shift: Shift) -> Vec<DeliveryRecord> {
    if table.is_empty() {
        return Vec::new();
    }
    let Some(columns) = detect_delivery_columns(table) else {
        return Vec::new();
    };
    debug!(
        shift = shift.as_str(),
        customer = %table.headers[columns.customer],
        date = ?columns.date.map(|index| table.headers[index].as_str()),
        quantity = ?columns.quantity.map(|index| table.headers[index].as_str()),
        "resolved delivery columns"
    );
    if columns.quantity.is_none() {
        debug!(shift = shift.as_str(), "no quantity column found, quantities default to 0");
    }

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for row in 0..table.rows.len() {
        let date = columns
            .date
            .and_then(|index| parse_table_date(table.cell(row, index)));
        let Some(date) = date else {
            dropped += 1;
            continue;
        };

        records.push(DeliveryRecord {
            customer_id: table.cell(row, columns.customer).trim().to_string(),
            date,
            shift,
            quantity: columns
                .quantity
                .map(|index| coerce_number(table.cell(row, index)))
                .unwrap_or(0.0),
        });
    }

    if dropped > 0 {
        debug!(shift = shift.as_str(), dropped, "dropped rows with unparseable dates");
    }
    records
}

/// Wide format: the date column is resolved as for long tables (falling back
/// to the first column); every other named column is a customer. Blank cells
/// are skipped.
pub fn normalize_wide_deliveries(table: &RawTable, shift: Shift) -> Vec<DeliveryRecord> {
    if table.is_empty() {
        return Vec::new();
    }
    let header_keys = table.header_keys();
    let date_column = find_candidate(&header_keys, &DELIVERY_DATE_CANDIDATES)
        .or_else(|| find_containing(&header_keys, "date", &[]))
        .unwrap_or(0);

    let customer_columns = table
        .headers
        .iter()
        .enumerate()
        .filter(|(index, header)| *index != date_column && !header.trim().is_empty())
        .map(|(index, header)| (index, header.trim().to_string()))
        .collect::<Vec<(usize, String)>>();

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in 0..table.rows.len() {
        let Some(date) = parse_table_date(table.cell(row, date_column)) else {
            dropped += 1;
            continue;
        };
        for (column, customer_id) in &customer_columns {
            let cell = table.cell(row, *column);
            if cell.trim().is_empty() {
                continue;
            }
            records.push(DeliveryRecord {
                customer_id: customer_id.clone(),
                date,
                shift,
                quantity: coerce_number(cell),
            });
        }
    }

    if dropped > 0 {
        debug!(shift = shift.as_str(), dropped, "dropped wide rows with unparseable dates");
    }
    records
}
