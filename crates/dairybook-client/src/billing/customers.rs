use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::billing::types::{DeliveryRecord, PaymentRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerSource {
    Deliveries,
    Payments,
}

impl CustomerSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deliveries => "deliveries",
            Self::Payments => "payments",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerEntry {
    pub customer_id: String,
    pub source: CustomerSource,
    pub first_delivery: Option<NaiveDate>,
}

/// Delivery customers in sorted order, then customers seen only in payments,
/// also sorted. Ids are compared exactly; blank ids are skipped.
pub fn list_customers(deliveries: &[DeliveryRecord], payments: &[PaymentRecord]) -> Vec<CustomerEntry> {
    let mut first_seen: BTreeMap<&str, NaiveDate> = BTreeMap::new();
    for record in deliveries.iter().filter(|record| !record.customer_id.trim().is_empty()) {
        first_seen
            .entry(record.customer_id.as_str())
            .and_modify(|current| *current = (*current).min(record.date))
            .or_insert(record.date);
    }

    let payment_only = payments
        .iter()
        .map(|payment| payment.customer_id.as_str())
        .filter(|customer_id| !customer_id.trim().is_empty() && !first_seen.contains_key(customer_id))
        .collect::<BTreeSet<&str>>();

    let mut entries = first_seen
        .iter()
        .map(|(customer_id, first)| CustomerEntry {
            customer_id: customer_id.to_string(),
            source: CustomerSource::Deliveries,
            first_delivery: Some(*first),
        })
        .collect::<Vec<CustomerEntry>>();
    entries.extend(payment_only.into_iter().map(|customer_id| CustomerEntry {
        customer_id: customer_id.to_string(),
        source: CustomerSource::Payments,
        first_delivery: None,
    }));
    entries
}

pub fn first_delivery_date(deliveries: &[DeliveryRecord], customer_id: &str) -> Option<NaiveDate> {
    deliveries
        .iter()
        .filter(|record| record.customer_id == customer_id)
        .map(|record| record.date)
        .min()
}

/// Default cycle start: the customer's first delivery, else `today`.
pub fn cycle_anchor(deliveries: &[DeliveryRecord], customer_id: &str, today: NaiveDate) -> NaiveDate {
    first_delivery_date(deliveries, customer_id).unwrap_or(today)
}
