use chrono::NaiveDate;
use tracing::debug;

use crate::billing::date::parse_table_date;
use crate::billing::types::Shift;
use crate::import::RawTable;
use crate::import::columns::{DELIVERY_DATE_CANDIDATES, coerce_number, find_candidate, find_containing};

const MILK_MARKERS: [&str; 2] = ["milk", "दूध"];
const SHIFT_CANDIDATES: [&str; 4] = ["shift", "session", "time", "पाली"];
const UNIT_CANDIDATES: [&str; 6] = ["cow", "cow_id", "cow_name", "unit", "animal", "गाय"];

/// One quantity reading from the production log.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionEntry {
    pub date: NaiveDate,
    pub shift: Option<Shift>,
    pub unit: Option<String>,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProductionColumns {
    date: usize,
    milk: Vec<(usize, Option<Shift>)>,
    shift: Option<usize>,
    unit: Option<usize>,
}

fn detect_production_columns(table: &RawTable) -> Option<ProductionColumns> {
    let header_keys = table.header_keys();
    let date = find_candidate(&header_keys, &DELIVERY_DATE_CANDIDATES)
        .or_else(|| find_containing(&header_keys, "date", &[]))
        .unwrap_or(0);

    let milk = header_keys
        .iter()
        .enumerate()
        .filter(|(index, key)| {
            *index != date && MILK_MARKERS.iter().any(|marker| key.contains(marker))
        })
        .map(|(index, key)| (index, shift_from_text(key)))
        .collect::<Vec<(usize, Option<Shift>)>>();
    if milk.is_empty() {
        return None;
    }

    let claimed = milk.iter().map(|(index, _)| *index).collect::<Vec<usize>>();
    let unclaimed = |index: &usize| *index != date && !claimed.contains(index);
    let shift = find_candidate(&header_keys, &SHIFT_CANDIDATES).filter(unclaimed);
    let unit = find_candidate(&header_keys, &UNIT_CANDIDATES)
        .or_else(|| find_containing(&header_keys, "cow", &claimed))
        .filter(unclaimed);

    Some(ProductionColumns {
        date,
        milk,
        shift,
        unit,
    })
}

/// Shift named by a header or cell: English `morning`/`evening` (or just the
/// leading letter) and Hindi `सुबह`/`शाम`.
pub fn shift_from_text(value: &str) -> Option<Shift> {
    let lowered = value.trim().to_lowercase();
    if lowered.contains("morning") || lowered.contains("सुबह") {
        return Some(Shift::Morning);
    }
    if lowered.contains("evening") || lowered.contains("शाम") {
        return Some(Shift::Evening);
    }
    match lowered.as_str() {
        "m" | "am" => Some(Shift::Morning),
        "e" | "pm" => Some(Shift::Evening),
        _ => None,
    }
}

/// Every milk-like column contributes one entry per row with a filled cell.
/// A shift named in the milk header beats the row's shift column.
pub fn normalize_production(table: &RawTable) -> Vec<ProductionEntry> {
    if table.is_empty() {
        return Vec::new();
    }
    let Some(columns) = detect_production_columns(table) else {
        debug!(headers = ?table.headers, "production log has no milk column");
        return Vec::new();
    };

    let mut entries = Vec::new();
    for row in 0..table.rows.len() {
        let Some(date) = parse_table_date(table.cell(row, columns.date)) else {
            continue;
        };
        let row_shift = columns
            .shift
            .and_then(|index| shift_from_text(table.cell(row, index)));
        let unit = columns
            .unit
            .map(|index| table.cell(row, index).trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        for (index, header_shift) in &columns.milk {
            let cell = table.cell(row, *index);
            if cell.trim().is_empty() {
                continue;
            }
            entries.push(ProductionEntry {
                date,
                shift: header_shift.or(row_shift),
                unit: unit.clone(),
                quantity: coerce_number(cell),
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::{normalize_production, shift_from_text};
    use crate::billing::types::Shift;
    use crate::import::RawTable;

    #[test]
    fn shift_text_understands_both_languages() {
        assert_eq!(shift_from_text("Morning"), Some(Shift::Morning));
        assert_eq!(shift_from_text("शाम"), Some(Shift::Evening));
        assert_eq!(shift_from_text(" E "), Some(Shift::Evening));
        assert_eq!(shift_from_text("noon"), None);
    }

    #[test]
    fn single_milk_column_uses_row_shift_and_unit() {
        let table = RawTable::from_rows(
            &["Date", "Cow", "Shift", "Milk (L)", "Feed"],
            &[
                &["2026-01-01", "Gauri", "M", "6.5", "2"],
                &["2026-01-01", "Gauri", "E", "5", "2"],
                &["2026-01-02", "", "", "", "2"],
            ],
        );
        let entries = normalize_production(&table);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].shift, Some(Shift::Morning));
        assert_eq!(entries[0].unit.as_deref(), Some("Gauri"));
        assert_eq!(entries[1].quantity, 5.0);
    }

    #[test]
    fn shift_named_milk_columns_split_one_row() {
        let table = RawTable::from_rows(
            &["दिनांक", "सुबह दूध", "शाम दूध"],
            &[&["2026-01-01", "7", "6"]],
        );
        let entries = normalize_production(&table);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].shift, Some(Shift::Morning));
        assert_eq!(entries[1].shift, Some(Shift::Evening));
        assert!(entries.iter().all(|entry| entry.unit.is_none()));
    }

    #[test]
    fn logs_without_milk_columns_yield_nothing() {
        let table = RawTable::from_rows(&["date", "feed"], &[&["2026-01-01", "3"]]);
        assert!(normalize_production(&table).is_empty());
    }
}
