use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::billing::types::{DeliveryRecord, Shift};

/// Unions morning and evening records into one series with at most one record
/// per (customer, date, shift); duplicates sum. Output is sorted by that key.
pub fn merge_shifts(morning: &[DeliveryRecord], evening: &[DeliveryRecord]) -> Vec<DeliveryRecord> {
    let mut totals: BTreeMap<(String, NaiveDate, Shift), f64> = BTreeMap::new();
    for record in morning.iter().chain(evening) {
        *totals
            .entry((record.customer_id.clone(), record.date, record.shift))
            .or_insert(0.0) += record.quantity;
    }

    totals
        .into_iter()
        .map(|((customer_id, date, shift), quantity)| DeliveryRecord {
            customer_id,
            date,
            shift,
            quantity,
        })
        .collect()
}
