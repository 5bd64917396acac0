use std::io;

use serde_json::Value;

use super::format::{self, Column, amount, array_field, f64_field, str_field};

pub fn render_outstanding(data: &Value, notices: &[String]) -> io::Result<String> {
    let balance = data
        .get("balance")
        .filter(|value| value.is_object())
        .ok_or_else(|| io::Error::other("outstanding output requires balance"))?;

    let customer = str_field(balance, "customer_id");
    let who = if customer == "ALL" {
        "all customers".to_string()
    } else {
        customer.to_string()
    };

    let mut lines = vec![format!(
        "Outstanding for {who}, {} to {}",
        str_field(data, "period_start"),
        str_field(data, "period_end")
    )];
    lines.extend(format::key_value_rows(
        &[
            ("Prior balance:", amount(f64_field(balance, "prior_balance"))),
            ("Period charge:", amount(f64_field(balance, "period_charge"))),
            ("Period payments:", amount(f64_field(balance, "period_payments"))),
            ("Due estimate:", amount(f64_field(balance, "due_estimate"))),
        ],
        2,
    ));

    let breakdown = array_field(data, "breakdown");
    if !breakdown.is_empty() {
        let columns = [
            Column::left("Customer"),
            Column::right("Prior"),
            Column::right("Charge"),
            Column::right("Payments"),
            Column::right("Due"),
        ];
        let rows = breakdown
            .iter()
            .map(|row| {
                vec![
                    str_field(row, "customer_id").to_string(),
                    amount(f64_field(row, "prior_balance")),
                    amount(f64_field(row, "period_charge")),
                    amount(f64_field(row, "period_payments")),
                    amount(f64_field(row, "due_estimate")),
                ]
            })
            .collect::<Vec<Vec<String>>>();

        lines.push(String::new());
        lines.push("By customer:".to_string());
        lines.extend(format::render_table_or_blocks(
            &columns,
            &rows,
            format::terminal_width(),
            "Customer",
        ));
    }

    lines.extend(format::source_lines(data));
    lines.extend(format::notice_lines(notices));
    Ok(lines.join("\n"))
}
