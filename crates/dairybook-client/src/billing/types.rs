use std::num::NonZeroU32;

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shift {
    Morning,
    Evening,
}

impl Shift {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryRecord {
    pub customer_id: String,
    pub date: NaiveDate,
    pub shift: Shift,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub customer_id: String,
    pub amount: f64,
    /// `None` means the payment applies to every cycle that considers it.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleSpec {
    pub customer_id: String,
    pub cycle_start: NaiveDate,
    pub cycle_length_days: NonZeroU32,
    pub price_per_unit: f64,
}

impl CycleSpec {
    /// Last day of the window, inclusive. Saturates at the calendar maximum.
    pub fn cycle_end(&self) -> NaiveDate {
        let offset = u64::from(self.cycle_length_days.get() - 1);
        self.cycle_start
            .checked_add_days(chrono::Days::new(offset))
            .unwrap_or(NaiveDate::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayStatus {
    BothPresent,
    MorningMissing,
    EveningMissing,
    BothMissing,
}

impl DayStatus {
    pub const ALL: [DayStatus; 4] = [
        Self::BothPresent,
        Self::MorningMissing,
        Self::EveningMissing,
        Self::BothMissing,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BothPresent => "both_present",
            Self::MorningMissing => "morning_missing",
            Self::EveningMissing => "evening_missing",
            Self::BothMissing => "both_missing",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BothPresent => "Both present",
            Self::MorningMissing => "Morning missing",
            Self::EveningMissing => "Evening missing",
            Self::BothMissing => "Both missing (customer skipped)",
        }
    }

    /// Calendar cell background.
    pub const fn color(self) -> &'static str {
        match self {
            Self::BothPresent => "#ffffff",
            Self::MorningMissing => "#ffc0cb",
            Self::EveningMissing => "#ffcc99",
            Self::BothMissing => "#ff9999",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayLedgerEntry {
    pub date: NaiveDate,
    pub morning_qty: f64,
    pub evening_qty: f64,
    pub total_qty: f64,
    pub status: DayStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleSummary {
    pub customer_id: String,
    pub cycle_start: NaiveDate,
    pub cycle_end: NaiveDate,
    pub price_per_unit: f64,
    pub total_quantity: f64,
    pub gross_amount: f64,
    pub early_payments: f64,
    pub final_payable: f64,
    pub credit: f64,
    pub days: Vec<DayLedgerEntry>,
}

/// Customer key used by the reconciler for the aggregate view.
pub const ALL_CUSTOMERS: &str = "ALL";

#[derive(Debug, Clone, PartialEq)]
pub struct OutstandingBalance {
    pub customer_id: String,
    pub prior_balance: f64,
    pub period_charge: f64,
    pub period_payments: f64,
    pub due_estimate: f64,
}

impl OutstandingBalance {
    pub fn new(
        customer_id: &str,
        prior_balance: f64,
        period_charge: f64,
        period_payments: f64,
    ) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            prior_balance,
            period_charge,
            period_payments,
            due_estimate: prior_balance + period_charge - period_payments,
        }
    }
}
