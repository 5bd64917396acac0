use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SourceUsed {
    pub table: String,
    pub source_kind: String,
    pub source_ref: Option<String>,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayRow {
    pub date: String,
    pub morning_qty: f64,
    pub evening_qty: f64,
    pub total_qty: f64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarLegendEntry {
    pub status: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarCellView {
    pub date: String,
    pub morning_qty: f64,
    pub evening_qty: f64,
    pub status: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub columns: usize,
    pub legend: Vec<CalendarLegendEntry>,
    /// Padding cells at the end of the last row are `null`.
    pub rows: Vec<Vec<Option<CalendarCellView>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentRow {
    pub customer_id: String,
    pub amount: f64,
    pub date: Option<String>,
    pub counted_in_cycle: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceData {
    pub customer_id: String,
    pub cycle_start: String,
    pub cycle_end: String,
    pub cycle_length_days: u32,
    pub price_per_unit: f64,
    pub total_quantity: f64,
    pub gross_amount: f64,
    pub early_payments: f64,
    pub final_payable: f64,
    pub credit: f64,
    pub days: Vec<DayRow>,
    pub calendar: CalendarView,
    pub payments: Vec<PaymentRow>,
    pub sources: Vec<SourceUsed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceRow {
    pub customer_id: String,
    pub prior_balance: f64,
    pub period_charge: f64,
    pub period_payments: f64,
    pub due_estimate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutstandingData {
    pub period_start: String,
    pub period_end: String,
    pub balance: BalanceRow,
    /// Per-customer rows in "ALL" mode; empty for a single customer.
    pub breakdown: Vec<BalanceRow>,
    pub sources: Vec<SourceUsed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerRow {
    pub customer_id: String,
    pub source: String,
    pub first_delivery: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomersData {
    pub customers: Vec<CustomerRow>,
    pub sources: Vec<SourceUsed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissingRow {
    pub date: String,
    pub customer_id: String,
    pub morning_qty: f64,
    pub evening_qty: f64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissingData {
    pub window_start: String,
    pub window_end: String,
    pub days: u32,
    pub customers_scanned: usize,
    pub rows: Vec<MissingRow>,
    pub sources: Vec<SourceUsed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionDayRow {
    pub date: String,
    pub morning_qty: f64,
    pub evening_qty: f64,
    pub unassigned_qty: f64,
    pub total_qty: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionUnitRow {
    pub unit: String,
    pub total_qty: f64,
    pub readings: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionData {
    pub from: Option<String>,
    pub to: Option<String>,
    pub days: Vec<ProductionDayRow>,
    pub units: Vec<ProductionUnitRow>,
    pub total_qty: f64,
    pub sources: Vec<SourceUsed>,
}
