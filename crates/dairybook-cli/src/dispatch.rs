use chrono::NaiveDate;
use dairybook_client::billing::date::parse_iso_date_strict;
use dairybook_client::commands;
use dairybook_client::commands::demo::DemoInvoiceOptions;
use dairybook_client::commands::invoice::InvoiceRunOptions;
use dairybook_client::commands::outstanding::OutstandingRunOptions;
use dairybook_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, DemoCommand, IsoDate};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    dispatch_with_today(cli, chrono::Local::now().date_naive())
}

/// `local_today` is used by commands whose `--today` flag was not given.
pub fn dispatch_with_today(cli: &Cli, local_today: NaiveDate) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Invoice {
            customer,
            start,
            days,
            price,
            today,
            sources,
            ..
        } => commands::invoice::run_with_options(InvoiceRunOptions {
            customer: customer.clone(),
            start: start.as_ref().map(|value| value.as_str().to_string()),
            days: *days,
            price: *price,
            today: resolve_today(today.as_ref(), local_today, "invoice")?,
            sources: sources.to_source_paths(),
            ..InvoiceRunOptions::default()
        }),
        Commands::Outstanding {
            customer,
            from,
            to,
            price,
            sources,
            ..
        } => commands::outstanding::run_with_options(OutstandingRunOptions {
            customer: customer.clone(),
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
            price: *price,
            sources: sources.to_source_paths(),
            ..OutstandingRunOptions::default()
        }),
        Commands::Customers { sources, .. } => commands::customers::run(sources.to_source_paths()),
        Commands::Missing {
            days, today, sources, ..
        } => commands::missing::run(
            *days,
            resolve_today(today.as_ref(), local_today, "missing")?,
            sources.to_source_paths(),
        ),
        Commands::Production {
            from, to, sources, ..
        } => commands::production::run(
            from.as_ref().map(IsoDate::as_str),
            to.as_ref().map(IsoDate::as_str),
            sources.to_source_paths(),
        ),
        Commands::Demo {
            command: DemoCommand::Invoice { customer, today, .. },
        } => commands::demo::run_invoice_with_options(DemoInvoiceOptions {
            customer: customer.clone(),
            today: resolve_today(today.as_ref(), local_today, "demo invoice")?,
        }),
    }
}

fn resolve_today(requested: Option<&IsoDate>, local_today: NaiveDate, command: &str) -> ClientResult<NaiveDate> {
    match requested {
        Some(value) => parse_iso_date_strict(value.as_str(), "today", command),
        None => Ok(local_today),
    }
}
