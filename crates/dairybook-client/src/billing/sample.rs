//! Deterministic in-memory data set for trying the engine without any files.

use chrono::NaiveDate;

use crate::billing::date::days_before;
use crate::billing::types::{DeliveryRecord, PaymentRecord, Shift};

pub const SAMPLE_CUSTOMERS: [&str; 2] = ["CUST001", "CUST002"];
pub const SAMPLE_DAYS: u32 = 12;
const SAMPLE_LOOKBACK_DAYS: u64 = 10;

/// Twelve days of both shifts per sample customer, starting ten days before
/// `today`.
pub fn sample_deliveries(today: NaiveDate) -> Vec<DeliveryRecord> {
    let start = days_before(today, SAMPLE_LOOKBACK_DAYS);
    let mut records = Vec::new();
    for customer_id in SAMPLE_CUSTOMERS {
        let mut current = Some(start);
        for index in 0..SAMPLE_DAYS {
            let Some(date) = current else {
                break;
            };
            let step = f64::from(index);
            records.push(DeliveryRecord {
                customer_id: customer_id.to_string(),
                date,
                shift: Shift::Morning,
                quantity: round_to(1.5 + (step % 3.0) * 0.5, 2),
            });
            records.push(DeliveryRecord {
                customer_id: customer_id.to_string(),
                date,
                shift: Shift::Evening,
                quantity: round_to(1.1 + (step % 2.0) * 0.4, 2),
            });
            current = date.succ_opt();
        }
    }
    records
}

pub fn sample_payments(today: NaiveDate) -> Vec<PaymentRecord> {
    vec![
        PaymentRecord {
            customer_id: SAMPLE_CUSTOMERS[0].to_string(),
            amount: 200.0,
            date: Some(days_before(today, 2)),
        },
        PaymentRecord {
            customer_id: SAMPLE_CUSTOMERS[1].to_string(),
            amount: 100.0,
            date: Some(days_before(today, 1)),
        },
    ]
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{sample_deliveries, sample_payments};
    use crate::billing::types::Shift;

    #[test]
    fn sample_set_shape() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 20).unwrap_or_default();
        let deliveries = sample_deliveries(today);
        assert_eq!(deliveries.len(), 48);
        assert_eq!(deliveries[0].date, NaiveDate::from_ymd_opt(2026, 5, 10).unwrap_or_default());
        assert_eq!(deliveries[0].quantity, 1.5);
        assert_eq!(deliveries[1].shift, Shift::Evening);
        assert_eq!(deliveries[1].quantity, 1.1);
        assert_eq!(deliveries[4].quantity, 2.5);
        assert_eq!(deliveries[3].quantity, 1.5);
        assert_eq!(deliveries[22].date, NaiveDate::from_ymd_opt(2026, 5, 21).unwrap_or_default());

        let payments = sample_payments(today);
        assert_eq!(payments[0].amount, 200.0);
        assert_eq!(payments[1].date, NaiveDate::from_ymd_opt(2026, 5, 19));
    }
}
