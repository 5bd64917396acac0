use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::billing::date::consecutive_dates;
use crate::billing::status::classify_day;
use crate::billing::types::{
    CycleSpec, CycleSummary, DayLedgerEntry, DeliveryRecord, PaymentRecord, Shift,
};

/// Computes one billing cycle for `spec.customer_id`. Customer ids match
/// exactly here; callers pick the id from the same tables they pass in.
///
/// Payments dated on or before the cycle end count as early payments, as do
/// undated payments. There is no lower bound.
pub fn compute_cycle(
    deliveries: &[DeliveryRecord],
    payments: &[PaymentRecord],
    spec: &CycleSpec,
) -> CycleSummary {
    let cycle_end = spec.cycle_end();
    let days = day_ledger(
        deliveries,
        &spec.customer_id,
        spec.cycle_start,
        spec.cycle_length_days.get(),
    );

    let total_quantity = days.iter().map(|day| day.total_qty).sum::<f64>();
    let gross_amount = total_quantity * spec.price_per_unit;
    let early_payments = customer_payments(payments, &spec.customer_id)
        .filter(|payment| payment.date.is_none_or(|date| date <= cycle_end))
        .map(|payment| payment.amount)
        .sum::<f64>();
    let (final_payable, credit) = settle(gross_amount, early_payments);

    CycleSummary {
        customer_id: spec.customer_id.clone(),
        cycle_start: spec.cycle_start,
        cycle_end,
        price_per_unit: spec.price_per_unit,
        total_quantity,
        gross_amount,
        early_payments,
        final_payable,
        credit,
        days,
    }
}

/// One entry per calendar day from `start`, quantities defaulting to 0 for
/// days without records.
pub fn day_ledger(
    deliveries: &[DeliveryRecord],
    customer_id: &str,
    start: NaiveDate,
    length: u32,
) -> Vec<DayLedgerEntry> {
    let mut pivot: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for record in deliveries.iter().filter(|record| record.customer_id == customer_id) {
        let slot = pivot.entry(record.date).or_insert((0.0, 0.0));
        match record.shift {
            Shift::Morning => slot.0 += record.quantity,
            Shift::Evening => slot.1 += record.quantity,
        }
    }

    consecutive_dates(start, length)
        .into_iter()
        .map(|date| {
            let (morning_qty, evening_qty) = pivot.get(&date).copied().unwrap_or((0.0, 0.0));
            DayLedgerEntry {
                date,
                morning_qty,
                evening_qty,
                total_qty: morning_qty + evening_qty,
                status: classify_day(morning_qty, evening_qty),
            }
        })
        .collect()
}

pub fn customer_payments<'a>(
    payments: &'a [PaymentRecord],
    customer_id: &'a str,
) -> impl Iterator<Item = &'a PaymentRecord> + 'a {
    payments
        .iter()
        .filter(move |payment| payment.customer_id == customer_id)
}

/// Splits `gross - early` into `(final_payable, credit)` so that at most one
/// side is positive and `final_payable - credit` equals the net exactly.
fn settle(gross_amount: f64, early_payments: f64) -> (f64, f64) {
    let net = gross_amount - early_payments;
    if net >= 0.0 { (net, 0.0) } else { (0.0, -net) }
}
