use std::io;

use serde_json::Value;

use super::format::{self, Column, amount, array_field, f64_field, quantity, str_field};

/// Renders `invoice` and `demo` results. The demo carries sample data only.
pub fn render_invoice(command: &str, data: &Value, notices: &[String]) -> io::Result<String> {
    let customer = data
        .get("customer_id")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("invoice output requires customer_id"))?;

    let heading = if command == "demo" {
        format!("Sample invoice for {customer}")
    } else {
        format!("Invoice for {customer}")
    };
    let cycle = format!(
        "{} to {} ({} days)",
        str_field(data, "cycle_start"),
        str_field(data, "cycle_end"),
        data.get("cycle_length_days").and_then(Value::as_u64).unwrap_or(0)
    );

    let mut lines = vec![heading];
    lines.extend(format::key_value_rows(
        &[
            ("Cycle:", cycle),
            ("Price per unit:", amount(f64_field(data, "price_per_unit"))),
            ("Total quantity:", quantity(f64_field(data, "total_quantity"))),
            ("Gross amount:", amount(f64_field(data, "gross_amount"))),
            ("Early payments:", amount(f64_field(data, "early_payments"))),
            ("Final payable:", amount(f64_field(data, "final_payable"))),
            ("Credit:", amount(f64_field(data, "credit"))),
        ],
        2,
    ));

    lines.push(String::new());
    lines.extend(calendar_lines(data));
    lines.push(String::new());
    lines.extend(day_lines(data));
    lines.push(String::new());
    lines.extend(payment_lines(data));
    lines.extend(format::source_lines(data));
    lines.extend(format::notice_lines(notices));

    Ok(lines.join("\n"))
}

fn status_marker(status: &str) -> &'static str {
    match status {
        "morning_missing" => "m",
        "evening_missing" => "e",
        "both_missing" => "x",
        _ => "",
    }
}

fn calendar_lines(data: &Value) -> Vec<String> {
    let calendar = data.get("calendar").unwrap_or(&Value::Null);
    let width = calendar
        .get("columns")
        .and_then(Value::as_u64)
        .and_then(|value| usize::try_from(value).ok())
        .unwrap_or(7);
    let names = (1..=width).map(|index| format!("D{index}")).collect::<Vec<String>>();
    let columns = names.iter().map(|name| Column::left(name)).collect::<Vec<Column<'_>>>();

    let rows = array_field(calendar, "rows")
        .iter()
        .map(|week| {
            week.as_array()
                .map(Vec::as_slice)
                .unwrap_or(&[])
                .iter()
                .map(|cell| {
                    if cell.is_null() {
                        return String::new();
                    }
                    let date = str_field(cell, "date");
                    let day = date.get(5..).unwrap_or(date);
                    format!("{day}{}", status_marker(str_field(cell, "status")))
                })
                .collect::<Vec<String>>()
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec!["Calendar (m = morning missing, e = evening missing, x = both missing):".to_string()];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &rows,
        format::terminal_width(),
        "Week",
    ));
    lines
}

fn day_lines(data: &Value) -> Vec<String> {
    let days = array_field(data, "days");
    let labels = array_field(data.get("calendar").unwrap_or(&Value::Null), "legend")
        .iter()
        .map(|entry| (str_field(entry, "status"), str_field(entry, "label")))
        .collect::<Vec<(&str, &str)>>();

    let columns = [
        Column::left("Date"),
        Column::right("Morning"),
        Column::right("Evening"),
        Column::right("Total"),
        Column::left("Status"),
    ];
    let rows = days
        .iter()
        .map(|day| {
            let status = str_field(day, "status");
            let label = labels
                .iter()
                .find(|(key, _)| *key == status)
                .map_or(status, |(_, label)| *label);
            vec![
                str_field(day, "date").to_string(),
                quantity(f64_field(day, "morning_qty")),
                quantity(f64_field(day, "evening_qty")),
                quantity(f64_field(day, "total_qty")),
                label.to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec!["Days:".to_string()];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &rows,
        format::terminal_width(),
        "Day",
    ));
    lines
}

fn payment_lines(data: &Value) -> Vec<String> {
    let payments = array_field(data, "payments");
    if payments.is_empty() {
        return vec!["Payments: none found".to_string()];
    }

    let columns = [
        Column::left("Date"),
        Column::right("Amount"),
        Column::left("Counted"),
    ];
    let rows = payments
        .iter()
        .map(|payment| {
            let counted = payment
                .get("counted_in_cycle")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            vec![
                payment
                    .get("date")
                    .and_then(Value::as_str)
                    .unwrap_or("undated")
                    .to_string(),
                amount(f64_field(payment, "amount")),
                if counted { "yes" } else { "no, after cycle end" }.to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec!["Payments:".to_string()];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &rows,
        format::terminal_width(),
        "Payment",
    ));
    lines
}
