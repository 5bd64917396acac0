use std::path::Path;

use crate::ClientResult;
use crate::billing::date::{build_period, format_iso_date};
use crate::billing::reconcile::{ReconcileInputs, ReconcilePeriod, reconcile_all, reconcile_customer};
use crate::billing::types::OutstandingBalance;
use crate::commands::common::{SourcePaths, SourceTable, load_config, load_sources};
use crate::contracts::envelope::{SuccessEnvelope, success_with_notices};
use crate::contracts::types::{BalanceRow, OutstandingData};

const NEEDED_TABLES: [SourceTable; 4] = [
    SourceTable::Morning,
    SourceTable::Evening,
    SourceTable::Payments,
    SourceTable::Ledger,
];

#[derive(Debug, Default)]
pub struct OutstandingRunOptions<'a> {
    /// `None` reconciles every customer in the delivery and payment tables.
    pub customer: Option<String>,
    pub from: String,
    pub to: String,
    pub price: Option<f64>,
    pub sources: SourcePaths,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(customer: Option<&str>, from: &str, to: &str, sources: SourcePaths) -> ClientResult<SuccessEnvelope> {
    run_with_options(OutstandingRunOptions {
        customer: customer.map(std::string::ToString::to_string),
        from: from.to_string(),
        to: to.to_string(),
        sources,
        ..OutstandingRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: OutstandingRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let (start, end) = build_period(&options.from, &options.to, "outstanding")?;
    let config = load_config(options.home_override, options.price, None, "outstanding")?;
    let loaded = load_sources(&options.sources, &NEEDED_TABLES, options.stdin_override)?;

    let prices = config.price_book_for(options.price);
    let inputs = ReconcileInputs {
        deliveries: &loaded.deliveries,
        payments: &loaded.payments,
        ledger: &loaded.ledger,
        prices: &prices,
    };
    let period = ReconcilePeriod { start, end };

    let customer = options
        .customer
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let (balance, breakdown) = match customer {
        Some(customer_id) => (reconcile_customer(&inputs, customer_id, period), Vec::new()),
        None => {
            let all = reconcile_all(&inputs, period);
            (all.total, all.customers)
        }
    };

    let data = OutstandingData {
        period_start: format_iso_date(&start),
        period_end: format_iso_date(&end),
        balance: balance_row(&balance),
        breakdown: breakdown.iter().map(balance_row).collect(),
        sources: loaded.sources,
    };
    success_with_notices("outstanding", data, loaded.notices)
}

fn balance_row(balance: &OutstandingBalance) -> BalanceRow {
    BalanceRow {
        customer_id: balance.customer_id.clone(),
        prior_balance: balance.prior_balance,
        period_charge: balance.period_charge,
        period_payments: balance.period_payments,
        due_estimate: balance.due_estimate,
    }
}
