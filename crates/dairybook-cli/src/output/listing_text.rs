use std::io;

use serde_json::Value;

use super::format::{self, Column, array_field, f64_field, quantity, str_field};

fn required_array<'a>(data: &'a Value, key: &str, command: &str) -> io::Result<&'a [Value]> {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| io::Error::other(format!("{command} output requires {key}")))
}

fn finish(mut lines: Vec<String>, data: &Value, notices: &[String]) -> String {
    lines.extend(format::source_lines(data));
    lines.extend(format::notice_lines(notices));
    lines.join("\n")
}

pub fn render_customers(data: &Value, notices: &[String]) -> io::Result<String> {
    let customers = required_array(data, "customers", "customers")?;
    if customers.is_empty() {
        return Ok(finish(
            vec!["No customers found in the given tables.".to_string()],
            data,
            notices,
        ));
    }

    let columns = [
        Column::left("Customer"),
        Column::left("Seen in"),
        Column::left("First delivery"),
    ];
    let rows = customers
        .iter()
        .map(|row| {
            vec![
                str_field(row, "customer_id").to_string(),
                str_field(row, "source").to_string(),
                row.get("first_delivery")
                    .and_then(Value::as_str)
                    .unwrap_or("-")
                    .to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![format!("Customers ({}):", customers.len())];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &rows,
        format::terminal_width(),
        "Customer",
    ));
    Ok(finish(lines, data, notices))
}

fn status_label(status: &str) -> &str {
    match status {
        "morning_missing" => "morning missing",
        "evening_missing" => "evening missing",
        "both_missing" => "both missing",
        other => other,
    }
}

pub fn render_missing(data: &Value, notices: &[String]) -> io::Result<String> {
    let rows = required_array(data, "rows", "missing")?;
    let heading = format!(
        "Missing entries, {} to {} ({} customers scanned)",
        str_field(data, "window_start"),
        str_field(data, "window_end"),
        data.get("customers_scanned").and_then(Value::as_u64).unwrap_or(0)
    );
    if rows.is_empty() {
        return Ok(finish(
            vec![heading, "  Every customer has both shifts recorded.".to_string()],
            data,
            notices,
        ));
    }

    let columns = [
        Column::left("Date"),
        Column::left("Customer"),
        Column::right("Morning"),
        Column::right("Evening"),
        Column::left("Status"),
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                str_field(row, "date").to_string(),
                str_field(row, "customer_id").to_string(),
                quantity(f64_field(row, "morning_qty")),
                quantity(f64_field(row, "evening_qty")),
                status_label(str_field(row, "status")).to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![heading];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Entry",
    ));
    Ok(finish(lines, data, notices))
}

pub fn render_production(data: &Value, notices: &[String]) -> io::Result<String> {
    let days = required_array(data, "days", "production")?;
    let range = match (
        data.get("from").and_then(Value::as_str),
        data.get("to").and_then(Value::as_str),
    ) {
        (Some(from), Some(to)) => format!(", {from} to {to}"),
        (Some(from), None) => format!(", from {from}"),
        (None, Some(to)) => format!(", up to {to}"),
        (None, None) => String::new(),
    };

    let mut lines = vec![format!("Production{range}")];
    lines.extend(format::key_value_rows(
        &[("Total:", quantity(f64_field(data, "total_qty")))],
        2,
    ));

    if !days.is_empty() {
        let columns = [
            Column::left("Date"),
            Column::right("Morning"),
            Column::right("Evening"),
            Column::right("No shift"),
            Column::right("Total"),
        ];
        let rows = days
            .iter()
            .map(|day| {
                vec![
                    str_field(day, "date").to_string(),
                    quantity(f64_field(day, "morning_qty")),
                    quantity(f64_field(day, "evening_qty")),
                    quantity(f64_field(day, "unassigned_qty")),
                    quantity(f64_field(day, "total_qty")),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.push(String::new());
        lines.push("By day:".to_string());
        lines.extend(format::render_table_or_blocks(
            &columns,
            &rows,
            format::terminal_width(),
            "Day",
        ));
    }

    let units = array_field(data, "units");
    if !units.is_empty() {
        let columns = [
            Column::left("Cow"),
            Column::right("Total"),
            Column::right("Readings"),
        ];
        let rows = units
            .iter()
            .map(|unit| {
                vec![
                    str_field(unit, "unit").to_string(),
                    quantity(f64_field(unit, "total_qty")),
                    unit.get("readings")
                        .and_then(Value::as_u64)
                        .unwrap_or(0)
                        .to_string(),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.push(String::new());
        lines.push("By cow:".to_string());
        lines.extend(format::render_table_or_blocks(
            &columns,
            &rows,
            format::terminal_width(),
            "Cow",
        ));
    }

    Ok(finish(lines, data, notices))
}
