use chrono::NaiveDate;

use crate::ClientResult;
use crate::billing::sample::{SAMPLE_CUSTOMERS, sample_deliveries, sample_payments};
use crate::commands::common::resolve_customer_id;
use crate::commands::invoice::{InvoiceWindow, build_invoice};
use crate::config::BillingConfig;
use crate::contracts::envelope::{SuccessEnvelope, success_with_notices};

pub const DEMO_NOTICE: &str = "sample data set (in-memory), no source tables were read";

#[derive(Debug, Default)]
pub struct DemoInvoiceOptions {
    /// Defaults to the first sample customer.
    pub customer: Option<String>,
    pub today: NaiveDate,
}

pub fn run_invoice(today: NaiveDate) -> ClientResult<SuccessEnvelope> {
    run_invoice_with_options(DemoInvoiceOptions {
        customer: None,
        today,
    })
}

/// Invoice over the deterministic sample set with built-in billing defaults,
/// so the result never depends on local configuration.
#[doc(hidden)]
pub fn run_invoice_with_options(options: DemoInvoiceOptions) -> ClientResult<SuccessEnvelope> {
    let deliveries = sample_deliveries(options.today);
    let payments = sample_payments(options.today);
    let requested = options
        .customer
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(SAMPLE_CUSTOMERS[0]);
    let customer_id = resolve_customer_id(requested, &deliveries, &payments);

    let data = build_invoice(
        &customer_id,
        &deliveries,
        &payments,
        &BillingConfig::default(),
        InvoiceWindow {
            start: None,
            price: None,
            today: options.today,
        },
        Vec::new(),
    );
    success_with_notices("demo", data, vec![DEMO_NOTICE.to_string()])
}
