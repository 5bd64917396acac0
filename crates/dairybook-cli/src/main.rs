mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use dairybook_client::ClientError;
use stdout_io::write_stdout_text;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DAIRYBOOK_LOG";

const ROOT_HELP: &str = "dairybook - dairy billing and reconciliation

Usage:
  dairybook <command>

Start here:
  dairybook demo invoice
  dairybook invoice --help
  dairybook --help
";

const TOP_LEVEL_HELP: &str = "dairybook - dairy billing and reconciliation

USAGE: dairybook <command>

Try it:
  dairybook demo invoice                                    Invoice a sample customer from built-in data

Bill a customer:
  dairybook invoice <customer> --morning m.csv --evening e.csv --payments p.csv
                                                            One billing cycle with day ledger and calendar
  dairybook invoice <customer> --start 2026-01-01 --days 30 --price 48
                                                            Override the cycle window or price

Reconcile balances:
  dairybook outstanding --from <date> --to <date> --ledger bills.csv ...
                                                            Everyone owed, with a per-customer breakdown
  dairybook outstanding <customer> --from <date> --to <date> ...
                                                            One customer's due estimate

Check the books:
  dairybook customers --morning m.csv ...                   Customers found in the tables
  dairybook missing --days 7 --morning m.csv --evening e.csv
                                                            Recent days with a shift not recorded
  dairybook production --production cows.csv                Milk produced per day, shift and cow

Every data command accepts --json. Tables are CSV or JSON arrays; pass `-` to read one from stdin.
Run `dairybook <command> --help` for flags and the accepted table shapes.
Set DAIRYBOOK_LOG=debug to see what was read and dropped (logs go to stderr).
";

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return handle_parse_error(&err, &raw_args),
    };
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn handle_parse_error(err: &clap::Error, raw_args: &[String]) -> Result<ExitCode, ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let text = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if write_stdout_text(&text).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        ErrorKind::DisplayVersion => {
            if write_stdout_text(&err.to_string()).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        kind => {
            let command_hint = if matches!(
                kind,
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
                    | ErrorKind::ArgumentConflict
            ) {
                command_path_from_args(raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error = parse_error_with_command_hint(&clean_message, command_hint.as_deref());
            if output::print_failure(&parse_error, infer_requested_output_mode(raw_args)).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(ExitCode::from(1))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing Usage line and "For more information" hint.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// The subcommand named on the command line, e.g. "invoice" or "demo invoice".
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let first = raw_args.iter().skip(1).find(|value| !value.starts_with('-'))?;
    let hint = match first.as_str() {
        "invoice" | "outstanding" | "customers" | "missing" | "production" => first.as_str(),
        "demo" => {
            if raw_args.iter().skip(2).any(|value| value == "invoice") {
                "demo invoice"
            } else {
                "demo"
            }
        }
        _ => return None,
    };
    Some(hint.to_string())
}

fn parse_error_with_command_hint(clean_message: &str, command_hint: Option<&str>) -> ClientError {
    if command_hint == Some("outstanding") && clean_message.contains("--from") && clean_message.contains("required") {
        return ClientError::invalid_argument_with_recovery(
            clean_message,
            vec![
                "Give the reconciliation period: `dairybook outstanding --from 2026-01-01 --to 2026-01-31`."
                    .to_string(),
                "Run `dairybook outstanding --help` for usage.".to_string(),
            ],
        );
    }

    ClientError::invalid_argument_for_command(clean_message, command_hint)
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &ClientError) -> bool {
    error.code.starts_with("internal_")
}
