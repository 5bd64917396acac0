use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroU32;

use chrono::NaiveDate;
use tracing::debug;

use crate::billing::cycle::compute_cycle;
use crate::billing::date::inclusive_day_count;
use crate::billing::normalize::customer_key;
use crate::billing::pricing::PriceBook;
use crate::billing::types::{ALL_CUSTOMERS, CycleSpec, DeliveryRecord, OutstandingBalance, PaymentRecord};
use crate::import::ledger::{PriorBill, latest_prior_bill};

/// Inclusive reconciliation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReconcilePeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn length_days(&self) -> NonZeroU32 {
        NonZeroU32::new(inclusive_day_count(self.start, self.end)).unwrap_or(NonZeroU32::MIN)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReconcileInputs<'a> {
    pub deliveries: &'a [DeliveryRecord],
    pub payments: &'a [PaymentRecord],
    pub ledger: &'a [PriorBill],
    pub prices: &'a PriceBook,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllCustomersBalance {
    pub total: OutstandingBalance,
    pub customers: Vec<OutstandingBalance>,
}

/// Balance for one customer. Names match after case folding and whitespace
/// collapsing, across every table.
pub fn reconcile_customer(
    inputs: &ReconcileInputs<'_>,
    customer_id: &str,
    period: ReconcilePeriod,
) -> OutstandingBalance {
    let Some(key) = customer_key(customer_id) else {
        return OutstandingBalance::new(customer_id, 0.0, 0.0, 0.0);
    };

    let prior_balance = latest_prior_bill(inputs.ledger, customer_id)
        .map(|bill| bill.prior_balance)
        .unwrap_or(0.0);
    let period_charge = period_charge(inputs, &key, period);
    let period_payments = inputs
        .payments
        .iter()
        .filter(|payment| customer_key(&payment.customer_id).as_deref() == Some(key.as_str()))
        .filter(|payment| payment.date.is_some_and(|date| period.contains(date)))
        .map(|payment| payment.amount)
        .sum::<f64>();

    debug!(
        customer = customer_id,
        prior_balance, period_charge, period_payments, "reconciled customer"
    );
    OutstandingBalance::new(customer_id.trim(), prior_balance, period_charge, period_payments)
}

/// Aggregate over every customer named in the delivery or payment tables.
/// Ledger-only customers are not part of the set.
pub fn reconcile_all(inputs: &ReconcileInputs<'_>, period: ReconcilePeriod) -> AllCustomersBalance {
    let mut names: BTreeMap<String, String> = BTreeMap::new();
    let delivery_ids = inputs.deliveries.iter().map(|record| record.customer_id.as_str());
    let payment_ids = inputs.payments.iter().map(|payment| payment.customer_id.as_str());
    for customer_id in delivery_ids.chain(payment_ids) {
        if let Some(key) = customer_key(customer_id) {
            names.entry(key).or_insert_with(|| customer_id.trim().to_string());
        }
    }

    let customers = names
        .values()
        .map(|customer_id| reconcile_customer(inputs, customer_id, period))
        .collect::<Vec<OutstandingBalance>>();

    let total = OutstandingBalance::new(
        ALL_CUSTOMERS,
        customers.iter().map(|balance| balance.prior_balance).sum(),
        customers.iter().map(|balance| balance.period_charge).sum(),
        customers.iter().map(|balance| balance.period_payments).sum(),
    );
    AllCustomersBalance { total, customers }
}

/// Gross cycle amount over the period for every delivery id that normalizes to
/// `key`, each priced through the price book.
fn period_charge(inputs: &ReconcileInputs<'_>, key: &str, period: ReconcilePeriod) -> f64 {
    let matching_ids = inputs
        .deliveries
        .iter()
        .map(|record| record.customer_id.as_str())
        .filter(|customer_id| customer_key(customer_id).as_deref() == Some(key))
        .collect::<BTreeSet<&str>>();

    matching_ids
        .into_iter()
        .map(|customer_id| {
            let spec = CycleSpec {
                customer_id: customer_id.to_string(),
                cycle_start: period.start,
                cycle_length_days: period.length_days(),
                price_per_unit: inputs.prices.price_for(customer_id),
            };
            compute_cycle(inputs.deliveries, &[], &spec).gross_amount
        })
        .sum()
}
