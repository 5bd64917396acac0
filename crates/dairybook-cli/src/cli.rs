use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dairybook_client::billing::pricing::{MAX_WINDOW_DAYS, window_length};
use dairybook_client::{SourcePaths, TableLayout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

pub fn parse_price(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err("price must be a number greater than or equal to 0".to_string()),
    }
}

pub fn parse_day_count(value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>().ok().and_then(window_length) {
        Some(days) => Ok(days.get()),
        None => Err(format!("day count must be a whole number from 1 to {MAX_WINDOW_DAYS}")),
    }
}

/// Shown after `--help` on every command that reads source tables.
pub const SOURCES_AFTER_HELP: &str = "\
Source Tables:
  Each table is a local file path, or `-` to read it from stdin.
  Only one table per invocation can come from stdin.
  Accepted formats:
    CSV  - one header row, then one row per record
    JSON - one top-level array of row objects
  A `Timestamp` column (form submission time) is ignored.

  --morning / --evening (distribution, long layout):
    customer column: customer_id, customer, cust_id, cust, id (else the first column)
    date column:     date, day, timestamp, ts (else a header containing `date`, else the second column)
    quantity column: litres, liters, qty, quantity, milk (else the first numeric column)
    Example:
      customer,date,litres
      CUST001,2026-01-01,2

  --layout wide:
    one date column plus one quantity column per customer.
    Example:
      Date,Sharma,Verma
      2026-01-01,1.5,2

  --payments:
    customer column: customer_id, customer, cust_id, cust (else the first column)
    amount column:   amount, amt, payment, paid (else the first numeric column)
    date column:     date, payment_date, timestamp, ts (optional)
    Undated payments count toward every billing cycle.

  --ledger (prior bills):
    Customer, AmountBilled, PaymentsApplied and/or Balance, optional PeriodEnd.
    The latest row per customer supplies the carried balance.

  --production (cow log):
    a date column, one or more columns whose header contains `milk` or `दूध`,
    optional Shift and Cow columns.

Billing defaults:
  Price per unit 45, cycle length 30 days. Override them in
  $DAIRYBOOK_HOME/config.json (default ~/.dairybook/config.json),
  with DAIRYBOOK_PRICE_PER_UNIT / DAIRYBOOK_CYCLE_LENGTH_DAYS, or per command.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    Long,
    Wide,
}

impl From<LayoutArg> for TableLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Long => TableLayout::Long,
            LayoutArg::Wide => TableLayout::Wide,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Morning distribution table (path or `-`)
    #[arg(long, value_name = "PATH")]
    pub morning: Option<String>,
    /// Evening distribution table (path or `-`)
    #[arg(long, value_name = "PATH")]
    pub evening: Option<String>,
    /// Payments table (path or `-`)
    #[arg(long, value_name = "PATH")]
    pub payments: Option<String>,
    /// Prior-bills ledger (path or `-`)
    #[arg(long, value_name = "PATH")]
    pub ledger: Option<String>,
    /// Production log (path or `-`)
    #[arg(long, value_name = "PATH")]
    pub production: Option<String>,
    /// Shape of the distribution tables
    #[arg(long, value_enum, default_value_t = LayoutArg::Long)]
    pub layout: LayoutArg,
}

impl SourceArgs {
    pub fn to_source_paths(&self) -> SourcePaths {
        SourcePaths {
            morning: self.morning.clone(),
            evening: self.evening.clone(),
            payments: self.payments.clone(),
            ledger: self.ledger.clone(),
            production: self.production.clone(),
            layout: self.layout.into(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "dairybook",
    version,
    about = "dairy billing and reconciliation",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute one billing cycle for a customer
    #[command(after_help = SOURCES_AFTER_HELP)]
    Invoice {
        /// Customer id as written in the tables (case and spacing are forgiven)
        customer: String,
        /// Cycle start (YYYY-MM-DD); defaults to the customer's first delivery
        #[arg(long, value_parser = parse_iso_date)]
        start: Option<IsoDate>,
        /// Cycle length in days
        #[arg(long, value_parser = parse_day_count)]
        days: Option<u32>,
        /// Price per unit for this invoice
        #[arg(long, value_parser = parse_price)]
        price: Option<f64>,
        /// Date treated as today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        today: Option<IsoDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// Estimate what a customer (or everyone) owes for a period
    #[command(after_help = SOURCES_AFTER_HELP)]
    Outstanding {
        /// Customer id; omit to reconcile every customer
        customer: Option<String>,
        /// Period start (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        from: IsoDate,
        /// Period end, inclusive (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        to: IsoDate,
        /// Price per unit for period charges
        #[arg(long, value_parser = parse_price)]
        price: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// List customers found in the distribution and payment tables
    #[command(after_help = SOURCES_AFTER_HELP)]
    Customers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// List recent days with a missing delivery shift
    #[command(after_help = SOURCES_AFTER_HELP)]
    Missing {
        /// Number of days to scan, ending today
        #[arg(long, value_parser = parse_day_count)]
        days: u32,
        /// Date treated as today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        today: Option<IsoDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// Summarize the production log by day, shift and cow
    #[command(after_help = SOURCES_AFTER_HELP)]
    Production {
        /// Start date filter (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        from: Option<IsoDate>,
        /// End date filter (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        to: Option<IsoDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// Try dairybook on a built-in sample data set
    #[command(arg_required_else_help = true)]
    Demo {
        #[command(subcommand)]
        command: DemoCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum DemoCommand {
    /// Invoice a sample customer (CUST001 or CUST002)
    Invoice {
        /// Sample customer id
        #[arg(long)]
        customer: Option<String>,
        /// Date treated as today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        today: Option<IsoDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
