use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const SOURCES_HELP_COMMAND: &str = "dairybook invoice --help";
pub(crate) const SOURCES_HELP_SECTION_TITLE: &str = "Source Tables";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_sources_help(self) -> Self {
        self.with_sources_help_data(json!({}))
    }

    pub fn with_sources_help_data(self, data: Value) -> Self {
        self.with_data(merge_sources_help_data(data))
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `dairybook {cmd} --help` for usage."),
            None => "Run `dairybook --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_table_format(message: &str, source: &str, received_format: &str) -> Self {
        Self::invalid_argument_with_recovery(
            message,
            vec![
                "Provide each table as CSV with a header row or as a JSON array of objects."
                    .to_string(),
                format!("Run `{SOURCES_HELP_COMMAND}` to review the accepted table shapes."),
            ],
        )
        .with_sources_help_data(json!({
            "source": source,
            "received_format": received_format,
            "supported_formats": ["csv", "json_array"],
        }))
    }

    pub fn source_unreadable(source: &str, path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "source_unreadable",
            &format!("Could not read the {source} table at `{location}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Omit the flag entirely if this table is not available yet.".to_string(),
            ],
        )
        .with_sources_help_data(json!({
            "source": source,
            "path": location,
        }))
    }

    pub fn stdin_conflict(sources: &[&str]) -> Self {
        Self::invalid_argument_with_recovery(
            "Only one source table can be read from stdin (`-`).",
            vec![
                "Pass file paths for all but one of the source flags.".to_string(),
                format!("Run `{SOURCES_HELP_COMMAND}` to review source flags."),
            ],
        )
        .with_data(json!({
            "stdin_sources": sources,
        }))
    }

    pub fn invalid_config(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "invalid_config",
            &format!("Billing configuration at `{location}` is invalid: {detail}"),
            vec![
                format!("Fix or remove `{location}`."),
                "Set `DAIRYBOOK_HOME` to a directory with a valid config.json to use another configuration."
                    .to_string(),
            ],
        )
    }

    pub fn invalid_config_env(variable: &str, value: &str, detail: &str) -> Self {
        Self::new(
            "invalid_config",
            &format!("Environment variable `{variable}` has invalid value `{value}`: {detail}"),
            vec![format!("Unset `{variable}` or set it to a valid value.")],
        )
    }

    pub fn config_home_unresolved(detail: &str) -> Self {
        Self::new(
            "internal_config_home",
            &format!("Could not resolve the dairybook home directory: {detail}"),
            vec!["Set `DAIRYBOOK_HOME` to a readable directory.".to_string()],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

fn merge_sources_help_data(mut data: Value) -> Value {
    if !data.is_object() {
        data = json!({});
    }

    if let Some(object) = data.as_object_mut() {
        object.insert(
            "help_command".to_string(),
            Value::String(SOURCES_HELP_COMMAND.to_string()),
        );
        object.insert(
            "help_section_title".to_string(),
            Value::String(SOURCES_HELP_SECTION_TITLE.to_string()),
        );
    }

    data
}

pub type ClientResult<T> = Result<T, ClientError>;
