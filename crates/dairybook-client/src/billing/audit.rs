use std::collections::BTreeSet;
use std::num::NonZeroU32;

use chrono::NaiveDate;

use crate::billing::cycle::day_ledger;
use crate::billing::date::days_before;
use crate::billing::types::{DayLedgerEntry, DayStatus, DeliveryRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct MissingEntry {
    pub customer_id: String,
    pub entry: DayLedgerEntry,
}

/// First and last day of a scan ending on `today`.
pub fn scan_window(today: NaiveDate, days: NonZeroU32) -> (NaiveDate, NaiveDate) {
    (days_before(today, u64::from(days.get() - 1)), today)
}

/// Days in the window ending on `today` where a delivery customer is missing
/// at least one shift. Sorted by date, then customer.
pub fn scan_missing_entries(
    deliveries: &[DeliveryRecord],
    today: NaiveDate,
    days: NonZeroU32,
) -> Vec<MissingEntry> {
    let (start, _) = scan_window(today, days);
    let customers = deliveries
        .iter()
        .map(|record| record.customer_id.as_str())
        .filter(|customer_id| !customer_id.trim().is_empty())
        .collect::<BTreeSet<&str>>();

    let mut missing = customers
        .into_iter()
        .flat_map(|customer_id| {
            day_ledger(deliveries, customer_id, start, days.get())
                .into_iter()
                .filter(|entry| entry.status != DayStatus::BothPresent)
                .map(move |entry| MissingEntry {
                    customer_id: customer_id.to_string(),
                    entry,
                })
        })
        .collect::<Vec<MissingEntry>>();
    missing.sort_by(|left, right| {
        left.entry
            .date
            .cmp(&right.entry.date)
            .then_with(|| left.customer_id.cmp(&right.customer_id))
    });
    missing
}
