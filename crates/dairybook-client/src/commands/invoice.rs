use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::billing::calendar::{CALENDAR_COLUMNS, calendar_grid};
use crate::billing::customers::cycle_anchor;
use crate::billing::cycle::{compute_cycle, customer_payments};
use crate::billing::date::{format_iso_date, parse_optional_iso_date};
use crate::billing::types::{
    CycleSpec, CycleSummary, DayLedgerEntry, DayStatus, DeliveryRecord, PaymentRecord,
};
use crate::commands::common::{SourcePaths, SourceTable, load_config, load_sources, resolve_customer_id};
use crate::config::BillingConfig;
use crate::contracts::envelope::{SuccessEnvelope, success_with_notices};
use crate::contracts::types::{
    CalendarCellView, CalendarLegendEntry, CalendarView, DayRow, InvoiceData, PaymentRow, SourceUsed,
};
use crate::{ClientError, ClientResult};

const NEEDED_TABLES: [SourceTable; 3] = [SourceTable::Morning, SourceTable::Evening, SourceTable::Payments];

#[derive(Debug, Default)]
pub struct InvoiceRunOptions<'a> {
    pub customer: String,
    pub start: Option<String>,
    pub days: Option<u32>,
    pub price: Option<f64>,
    pub today: NaiveDate,
    pub sources: SourcePaths,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(customer: &str, today: NaiveDate, sources: SourcePaths) -> ClientResult<SuccessEnvelope> {
    run_with_options(InvoiceRunOptions {
        customer: customer.to_string(),
        today,
        sources,
        ..InvoiceRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: InvoiceRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    if options.customer.trim().is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "A customer id is required.",
            Some("invoice"),
        ));
    }
    let start = parse_optional_iso_date(options.start.as_deref(), "start", "invoice")?;
    let config = load_config(options.home_override, options.price, options.days, "invoice")?;
    let loaded = load_sources(&options.sources, &NEEDED_TABLES, options.stdin_override)?;

    let customer_id = resolve_customer_id(&options.customer, &loaded.deliveries, &loaded.payments);
    let mut notices = loaded.notices;
    if !loaded.deliveries.iter().any(|record| record.customer_id == customer_id) {
        notices.push(format!("no deliveries found for customer `{customer_id}`"));
    }

    let data = build_invoice(
        &customer_id,
        &loaded.deliveries,
        &loaded.payments,
        &config,
        InvoiceWindow {
            start,
            price: options.price,
            today: options.today,
        },
        loaded.sources,
    );
    success_with_notices("invoice", data, notices)
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct InvoiceWindow {
    pub(crate) start: Option<NaiveDate>,
    pub(crate) price: Option<f64>,
    pub(crate) today: NaiveDate,
}

pub(crate) fn build_invoice(
    customer_id: &str,
    deliveries: &[DeliveryRecord],
    payments: &[PaymentRecord],
    config: &BillingConfig,
    window: InvoiceWindow,
    sources: Vec<SourceUsed>,
) -> InvoiceData {
    let spec = CycleSpec {
        customer_id: customer_id.to_string(),
        cycle_start: window
            .start
            .unwrap_or_else(|| cycle_anchor(deliveries, customer_id, window.today)),
        cycle_length_days: config.cycle_length_days,
        price_per_unit: config.price_book_for(window.price).price_for(customer_id),
    };
    let summary = compute_cycle(deliveries, payments, &spec);
    info!(
        customer = customer_id,
        cycle_start = %summary.cycle_start,
        gross_amount = summary.gross_amount,
        final_payable = summary.final_payable,
        "computed invoice"
    );

    let payment_rows = customer_payments(payments, customer_id)
        .map(|payment| PaymentRow {
            customer_id: payment.customer_id.clone(),
            amount: payment.amount,
            date: payment.date.as_ref().map(format_iso_date),
            counted_in_cycle: payment.date.is_none_or(|date| date <= summary.cycle_end),
        })
        .collect::<Vec<PaymentRow>>();

    invoice_data(&summary, spec.cycle_length_days.get(), payment_rows, sources)
}

fn invoice_data(
    summary: &CycleSummary,
    cycle_length_days: u32,
    payments: Vec<PaymentRow>,
    sources: Vec<SourceUsed>,
) -> InvoiceData {
    InvoiceData {
        customer_id: summary.customer_id.clone(),
        cycle_start: format_iso_date(&summary.cycle_start),
        cycle_end: format_iso_date(&summary.cycle_end),
        cycle_length_days,
        price_per_unit: summary.price_per_unit,
        total_quantity: summary.total_quantity,
        gross_amount: summary.gross_amount,
        early_payments: summary.early_payments,
        final_payable: summary.final_payable,
        credit: summary.credit,
        days: summary.days.iter().map(day_row).collect(),
        calendar: calendar_view(&summary.days),
        payments,
        sources,
    }
}

fn day_row(day: &DayLedgerEntry) -> DayRow {
    DayRow {
        date: format_iso_date(&day.date),
        morning_qty: day.morning_qty,
        evening_qty: day.evening_qty,
        total_qty: day.total_qty,
        status: day.status.as_str().to_string(),
    }
}

fn calendar_view(days: &[DayLedgerEntry]) -> CalendarView {
    let legend = DayStatus::ALL
        .iter()
        .map(|status| CalendarLegendEntry {
            status: status.as_str().to_string(),
            label: status.label().to_string(),
            color: status.color().to_string(),
        })
        .collect();

    let rows = calendar_grid(days)
        .into_iter()
        .map(|week| {
            week.into_iter()
                .map(|cell| {
                    cell.map(|value| CalendarCellView {
                        date: format_iso_date(&value.date),
                        morning_qty: value.morning_qty,
                        evening_qty: value.evening_qty,
                        status: value.status.as_str().to_string(),
                        color: value.color().to_string(),
                    })
                })
                .collect()
        })
        .collect();

    CalendarView {
        columns: CALENDAR_COLUMNS,
        legend,
        rows,
    }
}
