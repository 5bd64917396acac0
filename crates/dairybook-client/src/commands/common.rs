use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::ClientResult;
use crate::billing::merge::merge_shifts;
use crate::billing::normalize::customer_key;
use crate::billing::types::{DeliveryRecord, PaymentRecord, Shift};
use crate::config::{BillingConfig, load_billing_config};
use crate::contracts::types::SourceUsed;
use crate::import::delivery::{detect_delivery_columns, normalize_distribution};
use crate::import::input::{StdinSlot, resolve_source};
use crate::import::ledger::{PriorBill, normalize_ledger};
use crate::import::parse::parse_table;
use crate::import::payments::{detect_payment_columns, normalize_payments};
use crate::import::production::{ProductionEntry, normalize_production};
use crate::import::{FORM_TIMESTAMP_COLUMN, RawTable, TableLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTable {
    Morning,
    Evening,
    Payments,
    Ledger,
    Production,
}

impl SourceTable {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
            Self::Payments => "payments",
            Self::Ledger => "ledger",
            Self::Production => "production",
        }
    }
}

pub(crate) const DELIVERY_TABLES: [SourceTable; 2] = [SourceTable::Morning, SourceTable::Evening];

/// Where each source table comes from. `-` reads stdin.
#[derive(Debug, Clone, Default)]
pub struct SourcePaths {
    pub morning: Option<String>,
    pub evening: Option<String>,
    pub payments: Option<String>,
    pub ledger: Option<String>,
    pub production: Option<String>,
    pub layout: TableLayout,
}

impl SourcePaths {
    pub fn path_for(&self, table: SourceTable) -> Option<&str> {
        match table {
            SourceTable::Morning => self.morning.as_deref(),
            SourceTable::Evening => self.evening.as_deref(),
            SourceTable::Payments => self.payments.as_deref(),
            SourceTable::Ledger => self.ledger.as_deref(),
            SourceTable::Production => self.production.as_deref(),
        }
    }
}

/// Normalized records for the tables a command asked for.
#[derive(Debug, Default)]
pub(crate) struct LoadedSources {
    /// Morning and evening records after merging.
    pub(crate) deliveries: Vec<DeliveryRecord>,
    pub(crate) payments: Vec<PaymentRecord>,
    pub(crate) ledger: Vec<PriorBill>,
    pub(crate) production: Vec<ProductionEntry>,
    pub(crate) sources: Vec<SourceUsed>,
    pub(crate) notices: Vec<String>,
}

/// Loads only `needed` tables; paths given for other tables are ignored.
pub(crate) fn load_sources(
    paths: &SourcePaths,
    needed: &[SourceTable],
    stdin_override: Option<String>,
) -> ClientResult<LoadedSources> {
    let mut stdin = StdinSlot::new(stdin_override);
    let mut loaded = LoadedSources::default();
    let mut morning = Vec::new();
    let mut evening = Vec::new();

    for table in [
        SourceTable::Morning,
        SourceTable::Evening,
        SourceTable::Payments,
        SourceTable::Ledger,
        SourceTable::Production,
    ] {
        let Some(path_value) = paths.path_for(table) else {
            continue;
        };
        if !needed.contains(&table) {
            debug!(table = table.as_str(), "ignoring source not used by this command");
            continue;
        }

        let raw = load_table(table, path_value, &mut stdin, &mut loaded.sources)?;
        match table {
            SourceTable::Morning => {
                morning = load_deliveries(&raw, Shift::Morning, paths.layout, &mut loaded.notices);
            }
            SourceTable::Evening => {
                evening = load_deliveries(&raw, Shift::Evening, paths.layout, &mut loaded.notices);
            }
            SourceTable::Payments => {
                if !raw.is_empty() && detect_payment_columns(&raw).is_none() {
                    loaded
                        .notices
                        .push("payments table: no amount column found, continuing with no payments".to_string());
                }
                loaded.payments = normalize_payments(&raw);
            }
            SourceTable::Ledger => loaded.ledger = normalize_ledger(&raw),
            SourceTable::Production => loaded.production = normalize_production(&raw),
        }
    }

    let wants_deliveries = DELIVERY_TABLES.iter().any(|table| needed.contains(table));
    let has_deliveries = DELIVERY_TABLES.iter().any(|table| paths.path_for(*table).is_some());
    if wants_deliveries && !has_deliveries {
        loaded
            .notices
            .push("no morning or evening table given, delivery quantities are all 0".to_string());
    }

    loaded.deliveries = merge_shifts(&morning, &evening);
    debug!(
        deliveries = loaded.deliveries.len(),
        payments = loaded.payments.len(),
        ledger_rows = loaded.ledger.len(),
        production_entries = loaded.production.len(),
        "loaded source tables"
    );
    Ok(loaded)
}

fn load_table(
    table: SourceTable,
    path_value: &str,
    stdin: &mut StdinSlot,
    sources: &mut Vec<SourceUsed>,
) -> ClientResult<RawTable> {
    let resolved = resolve_source(table.as_str(), path_value, stdin)?;
    let raw = parse_table(table.as_str(), &resolved.content)?.without_columns(&[FORM_TIMESTAMP_COLUMN]);
    sources.push(SourceUsed {
        table: table.as_str().to_string(),
        source_kind: resolved.source_kind.as_str().to_string(),
        source_ref: resolved.source_ref,
        rows: raw.rows.len(),
    });
    Ok(raw)
}

fn load_deliveries(
    raw: &RawTable,
    shift: Shift,
    layout: TableLayout,
    notices: &mut Vec<String>,
) -> Vec<DeliveryRecord> {
    let records = normalize_distribution(raw, shift, layout);
    if raw.is_empty() || layout == TableLayout::Wide {
        return records;
    }

    let table = shift.as_str();
    if detect_delivery_columns(raw).is_some_and(|columns| columns.quantity.is_none()) {
        warn!(table, "distribution table has no quantity column");
        notices.push(format!("{table} table: no quantity column found, quantities read as 0"));
    }
    let dropped = raw.rows.len().saturating_sub(records.len());
    if dropped > 0 {
        notices.push(format!("{table} table: dropped {dropped} row(s) with unreadable dates"));
    }
    records
}

pub(crate) fn load_config(
    home_override: Option<&Path>,
    price_per_unit: Option<f64>,
    cycle_length_days: Option<u32>,
    command: &str,
) -> ClientResult<BillingConfig> {
    load_billing_config(home_override)?.with_flags(price_per_unit, cycle_length_days, command)
}

/// The id as written in the tables. Exact matches win; otherwise the first id
/// (in sorted order) that matches after case folding and whitespace collapsing.
pub(crate) fn resolve_customer_id(
    requested: &str,
    deliveries: &[DeliveryRecord],
    payments: &[PaymentRecord],
) -> String {
    let known = deliveries
        .iter()
        .map(|record| record.customer_id.as_str())
        .chain(payments.iter().map(|payment| payment.customer_id.as_str()))
        .collect::<BTreeSet<&str>>();
    if known.contains(requested) {
        return requested.to_string();
    }

    let wanted = customer_key(requested);
    let resolved = known
        .into_iter()
        .find(|candidate| wanted.is_some() && customer_key(candidate) == wanted)
        .unwrap_or(requested.trim());
    if resolved != requested {
        debug!(requested, resolved, "matched customer by normalized name");
    }
    resolved.to_string()
}
