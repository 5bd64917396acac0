use chrono::NaiveDate;
use tracing::debug;

use crate::billing::date::parse_table_date;
use crate::billing::normalize::{compact_header_key, customer_key};
use crate::import::RawTable;
use crate::import::columns::{coerce_number, find_candidate};

// Ledger headers are matched on compact keys (`Amount Billed` == `amountbilled`).
const LEDGER_CUSTOMER_CANDIDATES: [&str; 6] =
    ["customerid", "customer", "customername", "custid", "cust", "name"];
const LEDGER_BILLED_CANDIDATES: [&str; 4] = ["amountbilled", "billed", "billedamount", "billamount"];
const LEDGER_APPLIED_CANDIDATES: [&str; 4] =
    ["paymentsapplied", "paymentapplied", "applied", "amountpaid"];
const LEDGER_BALANCE_CANDIDATES: [&str; 3] = ["balance", "closingbalance", "balancedue"];
const LEDGER_PERIOD_END_CANDIDATES: [&str; 4] = ["periodend", "periodenddate", "cycleend", "enddate"];

/// One row of the prior-bills ledger, reduced to the balance it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorBill {
    pub customer_id: String,
    pub prior_balance: f64,
    pub period_end: Option<NaiveDate>,
    /// Position in the source table; later rows win ties on `period_end`.
    pub row_index: usize,
}

/// Rows with a blank customer are skipped. The carried balance is the
/// `Balance` cell when the column exists and the cell is filled, otherwise
/// `AmountBilled - PaymentsApplied` with a missing side read as 0, otherwise 0.
pub fn normalize_ledger(table: &RawTable) -> Vec<PriorBill> {
    if table.is_empty() {
        return Vec::new();
    }
    let compact_keys = table
        .headers
        .iter()
        .map(|header| compact_header_key(header))
        .collect::<Vec<String>>();

    let customer = find_candidate(&compact_keys, &LEDGER_CUSTOMER_CANDIDATES).unwrap_or(0);
    let billed = find_candidate(&compact_keys, &LEDGER_BILLED_CANDIDATES);
    let applied = find_candidate(&compact_keys, &LEDGER_APPLIED_CANDIDATES);
    let balance = find_candidate(&compact_keys, &LEDGER_BALANCE_CANDIDATES);
    let period_end = find_candidate(&compact_keys, &LEDGER_PERIOD_END_CANDIDATES);
    debug!(?billed, ?applied, ?balance, ?period_end, "resolved ledger columns");

    let mut bills = Vec::with_capacity(table.rows.len());
    for row in 0..table.rows.len() {
        let customer_id = table.cell(row, customer).trim();
        if customer_id.is_empty() {
            continue;
        }

        let balance_cell = balance
            .map(|index| table.cell(row, index).trim())
            .filter(|cell| !cell.is_empty());
        let prior_balance = match balance_cell {
            Some(cell) => coerce_number(cell),
            None if billed.is_some() || applied.is_some() => {
                let billed_amount = billed.map_or(0.0, |index| coerce_number(table.cell(row, index)));
                let applied_amount = applied.map_or(0.0, |index| coerce_number(table.cell(row, index)));
                billed_amount - applied_amount
            }
            None => 0.0,
        };

        bills.push(PriorBill {
            customer_id: customer_id.to_string(),
            prior_balance,
            period_end: period_end.and_then(|index| parse_table_date(table.cell(row, index))),
            row_index: row,
        });
    }
    bills
}

/// Most recent ledger row for `customer_id` (normalized match): latest
/// `period_end`, undated rows ranking lowest, later rows winning ties.
pub fn latest_prior_bill<'a>(bills: &'a [PriorBill], customer_id: &str) -> Option<&'a PriorBill> {
    let wanted = customer_key(customer_id)?;
    bills
        .iter()
        .filter(|bill| customer_key(&bill.customer_id).as_deref() == Some(wanted.as_str()))
        .max_by_key(|bill| (bill.period_end, bill.row_index))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{latest_prior_bill, normalize_ledger};
    use crate::import::RawTable;

    #[test]
    fn balance_column_wins_over_billed_minus_applied() {
        let table = RawTable::from_rows(
            &["Customer", "Amount Billed", "Payments Applied", "Balance"],
            &[&["CUST001", "500", "200", "250"], &["CUST002", "300", "100", ""]],
        );
        let bills = normalize_ledger(&table);
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].prior_balance, 250.0);
        assert_eq!(bills[1].prior_balance, 200.0);
    }

    #[test]
    fn missing_sides_read_as_zero() {
        let billed_only = RawTable::from_rows(&["customer", "AmountBilled"], &[&["A", "120"]]);
        assert_eq!(normalize_ledger(&billed_only)[0].prior_balance, 120.0);

        let neither = RawTable::from_rows(&["customer", "note"], &[&["A", "settled"]]);
        assert_eq!(normalize_ledger(&neither)[0].prior_balance, 0.0);
    }

    #[test]
    fn latest_row_is_picked_by_period_end_then_position() {
        let table = RawTable::from_rows(
            &["customer", "balance", "period_end"],
            &[
                &["Ravi Kumar", "90", "2026-02-28"],
                &["ravi  kumar", "40", "2026-01-31"],
                &["Ravi Kumar", "15", ""],
                &["RAVI KUMAR", "70", "2026-02-28"],
            ],
        );
        let bills = normalize_ledger(&table);
        let latest = latest_prior_bill(&bills, " ravi kumar ");
        assert_eq!(latest.map(|bill| bill.prior_balance), Some(70.0));
        assert_eq!(
            latest.and_then(|bill| bill.period_end),
            NaiveDate::from_ymd_opt(2026, 2, 28)
        );
        assert!(latest_prior_bill(&bills, "Sita").is_none());
    }
}
