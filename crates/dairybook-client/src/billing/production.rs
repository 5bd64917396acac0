use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::billing::types::Shift;
use crate::import::production::ProductionEntry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionDay {
    pub date: NaiveDate,
    pub morning_qty: f64,
    pub evening_qty: f64,
    /// Readings without a recognizable shift.
    pub unassigned_qty: f64,
    pub total_qty: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitTotal {
    pub unit: String,
    pub total_qty: f64,
    pub readings: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionSummary {
    pub days: Vec<ProductionDay>,
    pub units: Vec<UnitTotal>,
    pub total_qty: f64,
}

/// Per-day totals split by shift and per-unit totals, optionally bounded to
/// `[from, to]` (either side open).
pub fn summarize_production(
    entries: &[ProductionEntry],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> ProductionSummary {
    let mut days: BTreeMap<NaiveDate, ProductionDay> = BTreeMap::new();
    let mut units: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    let in_range = |date: NaiveDate| {
        from.is_none_or(|start| date >= start) && to.is_none_or(|end| date <= end)
    };
    for entry in entries.iter().filter(|entry| in_range(entry.date)) {
        let day = days.entry(entry.date).or_insert_with(|| ProductionDay {
            date: entry.date,
            ..ProductionDay::default()
        });
        match entry.shift {
            Some(Shift::Morning) => day.morning_qty += entry.quantity,
            Some(Shift::Evening) => day.evening_qty += entry.quantity,
            None => day.unassigned_qty += entry.quantity,
        }
        day.total_qty += entry.quantity;

        if let Some(unit) = entry.unit.as_deref() {
            let slot = units.entry(unit).or_insert((0.0, 0));
            slot.0 += entry.quantity;
            slot.1 += 1;
        }
    }

    let days = days.into_values().collect::<Vec<ProductionDay>>();
    let total_qty = days.iter().map(|day| day.total_qty).sum();
    ProductionSummary {
        days,
        units: units
            .into_iter()
            .map(|(unit, (total_qty, readings))| UnitTotal {
                unit: unit.to_string(),
                total_qty,
                readings,
            })
            .collect(),
        total_qty,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::summarize_production;
    use crate::billing::types::Shift;
    use crate::import::production::ProductionEntry;

    fn entry(day: u32, shift: Option<Shift>, unit: Option<&str>, quantity: f64) -> ProductionEntry {
        ProductionEntry {
            date: NaiveDate::from_ymd_opt(2026, 6, day).unwrap_or_default(),
            shift,
            unit: unit.map(str::to_string),
            quantity,
        }
    }

    #[test]
    fn totals_split_by_day_shift_and_unit() {
        let entries = vec![
            entry(1, Some(Shift::Morning), Some("Gauri"), 6.0),
            entry(1, Some(Shift::Evening), Some("Gauri"), 5.0),
            entry(1, None, Some("Kamdhenu"), 4.0),
            entry(2, Some(Shift::Morning), None, 3.0),
        ];
        let summary = summarize_production(&entries, None, None);
        assert_eq!(summary.days.len(), 2);
        assert_eq!(summary.days[0].morning_qty, 6.0);
        assert_eq!(summary.days[0].unassigned_qty, 4.0);
        assert_eq!(summary.days[0].total_qty, 15.0);
        assert_eq!(summary.total_qty, 18.0);
        assert_eq!(summary.units.len(), 2);
        assert_eq!(summary.units[0].unit, "Gauri");
        assert_eq!(summary.units[0].readings, 2);
    }

    #[test]
    fn bounds_are_inclusive() {
        let entries = vec![entry(1, None, None, 1.0), entry(2, None, None, 2.0), entry(3, None, None, 4.0)];
        let from = NaiveDate::from_ymd_opt(2026, 6, 2);
        let summary = summarize_production(&entries, from, from);
        assert_eq!(summary.total_qty, 2.0);
        assert_eq!(summarize_production(&entries, from, None).total_qty, 6.0);
    }
}
