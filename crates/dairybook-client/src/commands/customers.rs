use crate::ClientResult;
use crate::billing::customers::list_customers;
use crate::billing::date::format_iso_date;
use crate::commands::common::{SourcePaths, SourceTable, load_sources};
use crate::contracts::envelope::{SuccessEnvelope, success_with_notices};
use crate::contracts::types::{CustomerRow, CustomersData};

const NEEDED_TABLES: [SourceTable; 3] = [SourceTable::Morning, SourceTable::Evening, SourceTable::Payments];

#[derive(Debug, Default)]
pub struct CustomersRunOptions {
    pub sources: SourcePaths,
    pub stdin_override: Option<String>,
}

pub fn run(sources: SourcePaths) -> ClientResult<SuccessEnvelope> {
    run_with_options(CustomersRunOptions {
        sources,
        ..CustomersRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: CustomersRunOptions) -> ClientResult<SuccessEnvelope> {
    let loaded = load_sources(&options.sources, &NEEDED_TABLES, options.stdin_override)?;
    let customers = list_customers(&loaded.deliveries, &loaded.payments)
        .into_iter()
        .map(|entry| CustomerRow {
            customer_id: entry.customer_id,
            source: entry.source.as_str().to_string(),
            first_delivery: entry.first_delivery.as_ref().map(format_iso_date),
        })
        .collect::<Vec<CustomerRow>>();

    let data = CustomersData {
        customers,
        sources: loaded.sources,
    };
    success_with_notices("customers", data, loaded.notices)
}
