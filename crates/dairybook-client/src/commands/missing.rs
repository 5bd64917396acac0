use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::billing::audit::{scan_missing_entries, scan_window};
use crate::billing::date::format_iso_date;
use crate::billing::pricing::{MAX_WINDOW_DAYS, window_length};
use crate::commands::common::{DELIVERY_TABLES, SourcePaths, load_sources};
use crate::contracts::envelope::{SuccessEnvelope, success_with_notices};
use crate::contracts::types::{MissingData, MissingRow};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct MissingRunOptions {
    pub days: u32,
    pub today: NaiveDate,
    pub sources: SourcePaths,
    pub stdin_override: Option<String>,
}

pub fn run(days: u32, today: NaiveDate, sources: SourcePaths) -> ClientResult<SuccessEnvelope> {
    run_with_options(MissingRunOptions {
        days,
        today,
        sources,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: MissingRunOptions) -> ClientResult<SuccessEnvelope> {
    let days = window_length(options.days).ok_or_else(|| {
        ClientError::invalid_argument_for_command(
            &format!("`--days` must be between 1 and {MAX_WINDOW_DAYS}."),
            Some("missing"),
        )
    })?;
    let loaded = load_sources(&options.sources, &DELIVERY_TABLES, options.stdin_override)?;

    let (window_start, window_end) = scan_window(options.today, days);
    let missing = scan_missing_entries(&loaded.deliveries, options.today, days);
    let customers_scanned = loaded
        .deliveries
        .iter()
        .map(|record| record.customer_id.as_str())
        .filter(|customer_id| !customer_id.trim().is_empty())
        .collect::<BTreeSet<&str>>()
        .len();

    let rows = missing
        .into_iter()
        .map(|item| MissingRow {
            date: format_iso_date(&item.entry.date),
            customer_id: item.customer_id,
            morning_qty: item.entry.morning_qty,
            evening_qty: item.entry.evening_qty,
            status: item.entry.status.as_str().to_string(),
        })
        .collect::<Vec<MissingRow>>();

    let data = MissingData {
        window_start: format_iso_date(&window_start),
        window_end: format_iso_date(&window_end),
        days: days.get(),
        customers_scanned,
        rows,
        sources: loaded.sources,
    };
    success_with_notices("missing", data, loaded.notices)
}
