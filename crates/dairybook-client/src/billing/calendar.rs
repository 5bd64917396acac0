use chrono::NaiveDate;

use crate::billing::types::{DayLedgerEntry, DayStatus};

pub const CALENDAR_COLUMNS: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub morning_qty: f64,
    pub evening_qty: f64,
    pub status: DayStatus,
}

impl CalendarCell {
    pub fn color(&self) -> &'static str {
        self.status.color()
    }
}

/// Day ledger laid out seven cells per row starting at the first day, with the
/// last row padded by `None`.
pub fn calendar_grid(days: &[DayLedgerEntry]) -> Vec<Vec<Option<CalendarCell>>> {
    let mut sorted = days.iter().collect::<Vec<&DayLedgerEntry>>();
    sorted.sort_by_key(|day| day.date);

    sorted
        .chunks(CALENDAR_COLUMNS)
        .map(|week| {
            let mut row = week
                .iter()
                .map(|day| {
                    Some(CalendarCell {
                        date: day.date,
                        morning_qty: day.morning_qty,
                        evening_qty: day.evening_qty,
                        status: day.status,
                    })
                })
                .collect::<Vec<Option<CalendarCell>>>();
            row.resize(CALENDAR_COLUMNS, None);
            row
        })
        .collect()
}
