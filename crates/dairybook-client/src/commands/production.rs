use crate::ClientResult;
use crate::billing::date::{build_period, format_iso_date, parse_optional_iso_date};
use crate::billing::production::summarize_production;
use crate::commands::common::{SourcePaths, SourceTable, load_sources};
use crate::contracts::envelope::{SuccessEnvelope, success_with_notices};
use crate::contracts::types::{ProductionData, ProductionDayRow, ProductionUnitRow};

#[derive(Debug, Default)]
pub struct ProductionRunOptions {
    pub from: Option<String>,
    pub to: Option<String>,
    pub sources: SourcePaths,
    pub stdin_override: Option<String>,
}

pub fn run(from: Option<&str>, to: Option<&str>, sources: SourcePaths) -> ClientResult<SuccessEnvelope> {
    run_with_options(ProductionRunOptions {
        from: from.map(std::string::ToString::to_string),
        to: to.map(std::string::ToString::to_string),
        sources,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ProductionRunOptions) -> ClientResult<SuccessEnvelope> {
    let (from, to) = match (options.from.as_deref(), options.to.as_deref()) {
        (Some(from), Some(to)) => {
            let (start, end) = build_period(from, to, "production")?;
            (Some(start), Some(end))
        }
        (from, to) => (
            parse_optional_iso_date(from, "from", "production")?,
            parse_optional_iso_date(to, "to", "production")?,
        ),
    };

    let mut loaded = load_sources(&options.sources, &[SourceTable::Production], options.stdin_override)?;
    if options.sources.production.is_none() {
        loaded
            .notices
            .push("no production table given, totals are all 0".to_string());
    }

    let summary = summarize_production(&loaded.production, from, to);
    let data = ProductionData {
        from: from.as_ref().map(format_iso_date),
        to: to.as_ref().map(format_iso_date),
        days: summary
            .days
            .iter()
            .map(|day| ProductionDayRow {
                date: format_iso_date(&day.date),
                morning_qty: day.morning_qty,
                evening_qty: day.evening_qty,
                unassigned_qty: day.unassigned_qty,
                total_qty: day.total_qty,
            })
            .collect(),
        units: summary
            .units
            .iter()
            .map(|unit| ProductionUnitRow {
                unit: unit.unit.clone(),
                total_qty: unit.total_qty,
                readings: unit.readings,
            })
            .collect(),
        total_qty: summary.total_qty,
        sources: loaded.sources,
    };
    success_with_notices("production", data, loaded.notices)
}
