use tracing::{debug, warn};

use crate::billing::date::parse_table_date;
use crate::billing::types::PaymentRecord;
use crate::import::RawTable;
use crate::import::columns::{
    PAYMENT_AMOUNT_CANDIDATES, PAYMENT_CUSTOMER_CANDIDATES, PAYMENT_DATE_CANDIDATES, coerce_number,
    find_candidate, first_numeric_column,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentColumns {
    pub customer: usize,
    pub amount: usize,
    pub date: Option<usize>,
}

/// `None` when the table has no amount-like column.
pub fn detect_payment_columns(table: &RawTable) -> Option<PaymentColumns> {
    if table.column_count() == 0 {
        return None;
    }
    let header_keys = table.header_keys();
    let customer = find_candidate(&header_keys, &PAYMENT_CUSTOMER_CANDIDATES).unwrap_or(0);
    let amount = find_candidate(&header_keys, &PAYMENT_AMOUNT_CANDIDATES)
        .or_else(|| first_numeric_column(table, &[customer]))?;
    let date = find_candidate(&header_keys, &PAYMENT_DATE_CANDIDATES);

    Some(PaymentColumns {
        customer,
        amount,
        date,
    })
}

/// Every row becomes a payment. Rows whose date does not parse keep `date: None`.
pub fn normalize_payments(table: &RawTable) -> Vec<PaymentRecord> {
    if table.is_empty() {
        return Vec::new();
    }
    let Some(columns) = detect_payment_columns(table) else {
        warn!(
            headers = ?table.headers,
            "payment table has no amount column, continuing with no payments"
        );
        return Vec::new();
    };
    debug!(
        customer = %table.headers[columns.customer],
        amount = %table.headers[columns.amount],
        date = ?columns.date.map(|index| table.headers[index].as_str()),
        "resolved payment columns"
    );

    (0..table.rows.len())
        .map(|row| PaymentRecord {
            customer_id: table.cell(row, columns.customer).trim().to_string(),
            amount: coerce_number(table.cell(row, columns.amount)),
            date: columns
                .date
                .and_then(|index| parse_table_date(table.cell(row, index))),
        })
        .collect()
}
