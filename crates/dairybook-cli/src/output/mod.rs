mod error_text;
mod format;
mod invoice_text;
mod json;
mod listing_text;
mod mode;
mod outstanding_text;

use std::io;

use dairybook_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    let data = &success.data;
    let notices = success.notices.as_slice();
    match success.command.as_str() {
        "invoice" | "demo" => invoice_text::render_invoice(&success.command, data, notices),
        "outstanding" => outstanding_text::render_outstanding(data, notices),
        "customers" => listing_text::render_customers(data, notices),
        "missing" => listing_text::render_missing(data, notices),
        "production" => listing_text::render_production(data, notices),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
