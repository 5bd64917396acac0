use std::fs;
use std::io::{IsTerminal, Read};
use std::path::Path;

use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum SourceKind {
    File,
    Stdin,
}

impl SourceKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedSource {
    pub(crate) source_kind: SourceKind,
    pub(crate) source_ref: Option<String>,
    pub(crate) content: String,
}

/// Hands stdin to at most one source per invocation.
#[derive(Debug, Default)]
pub(crate) struct StdinSlot {
    stdin_override: Option<String>,
    claimed_by: Option<String>,
}

impl StdinSlot {
    pub(crate) fn new(stdin_override: Option<String>) -> Self {
        Self {
            stdin_override,
            claimed_by: None,
        }
    }

    fn claim(&mut self, source: &str) -> ClientResult<String> {
        if let Some(previous) = &self.claimed_by {
            return Err(ClientError::stdin_conflict(&[previous.as_str(), source]));
        }
        self.claimed_by = Some(source.to_string());

        let body = read_stdin(self.stdin_override.take())?;
        match body {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ClientError::invalid_argument_with_recovery(
                &format!(
                    "Path `-` means stdin input for the {source} table, but stdin was empty."
                ),
                vec![
                    "Pipe CSV or JSON input, or pass a file path instead.".to_string(),
                ],
            )),
        }
    }
}

pub(crate) fn resolve_source(
    source: &str,
    path_value: &str,
    stdin: &mut StdinSlot,
) -> ClientResult<ResolvedSource> {
    if path_value == "-" {
        let content = stdin.claim(source)?;
        return Ok(ResolvedSource {
            source_kind: SourceKind::Stdin,
            source_ref: None,
            content,
        });
    }

    let content = fs::read_to_string(path_value).map_err(|error| {
        ClientError::source_unreadable(source, Path::new(path_value), &error.to_string())
    })?;

    Ok(ResolvedSource {
        source_kind: SourceKind::File,
        source_ref: Some(path_value.to_string()),
        content,
    })
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(Some(value));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| {
            ClientError::invalid_argument_with_recovery(
                &format!("Could not read stdin: {error}"),
                vec![
                    "Retry with an explicit file path argument.".to_string(),
                    "Or rerun with valid stdin content.".to_string(),
                ],
            )
        })?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(buffer))
}

#[cfg(test)]
mod tests {
    use super::{SourceKind, StdinSlot, resolve_source};

    #[test]
    fn stdin_can_only_feed_one_source() {
        let mut slot = StdinSlot::new(Some("customer,date,qty\n".to_string()));
        let first = resolve_source("morning", "-", &mut slot);
        assert!(first.is_ok());
        if let Ok(resolved) = first {
            assert_eq!(resolved.source_kind, SourceKind::Stdin);
            assert_eq!(resolved.source_kind.as_str(), "stdin");
        }

        let second = resolve_source("evening", "-", &mut slot);
        assert!(second.is_err());
        if let Err(error) = second {
            assert_eq!(error.code, "invalid_argument");
            assert!(error.message.contains("stdin"));
        }
    }

    #[test]
    fn missing_file_is_reported_as_unreadable() {
        let mut slot = StdinSlot::default();
        let result = resolve_source("payments", "/nonexistent/dairybook/payments.csv", &mut slot);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "source_unreadable");
        }
    }
}
