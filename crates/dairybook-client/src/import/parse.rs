use serde_json::{Map, Value};
use tracing::debug;

use crate::import::RawTable;
use crate::{ClientError, ClientResult};

/// Parses a source body into a [`RawTable`]. CSV needs a header row; JSON must
/// be one top-level array of objects. Blank input is an empty table.
pub(crate) fn parse_table(source: &str, content: &str) -> ClientResult<RawTable> {
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        debug!(source, "source body is blank, using an empty table");
        return Ok(RawTable::default());
    }

    if looks_like_ndjson(trimmed) {
        return Err(ClientError::invalid_table_format(
            &format!("The {source} table looks like NDJSON, which is not supported. Provide a JSON array or CSV."),
            source,
            "ndjson",
        ));
    }

    if trimmed.starts_with('[') {
        return parse_json_array(source, trimmed);
    }

    if trimmed.starts_with('{') && serde_json::from_str::<Value>(trimmed).is_ok() {
        return Err(ClientError::invalid_table_format(
            &format!("JSON input for the {source} table must be a top-level array of row objects."),
            source,
            "json_non_array",
        ));
    }

    parse_csv(source, trimmed)
}

fn parse_json_array(source: &str, content: &str) -> ClientResult<RawTable> {
    let parsed = serde_json::from_str::<Value>(content).map_err(|_| {
        ClientError::invalid_table_format(
            &format!("Invalid JSON input for the {source} table. Provide a valid JSON array."),
            source,
            "json_invalid",
        )
    })?;

    let Some(items) = parsed.as_array() else {
        return Err(ClientError::invalid_table_format(
            &format!("JSON input for the {source} table must be a top-level array of row objects."),
            source,
            "json_non_array",
        ));
    };

    let mut objects: Vec<&Map<String, Value>> = Vec::with_capacity(items.len());
    for item in items {
        let Some(object) = item.as_object() else {
            return Err(ClientError::invalid_table_format(
                &format!("JSON array entries for the {source} table must all be objects."),
                source,
                "json_array_mixed",
            ));
        };
        objects.push(object);
    }

    let mut headers: Vec<String> = Vec::new();
    for object in &objects {
        for key in object.keys() {
            if !headers.iter().any(|existing| existing == key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = objects
        .iter()
        .map(|object| {
            headers
                .iter()
                .map(|header| cell_text(object.get(header)))
                .collect::<Vec<String>>()
        })
        .collect::<Vec<Vec<String>>>();

    Ok(RawTable::new(headers, rows))
}

fn parse_csv(source: &str, content: &str) -> ClientResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| {
            ClientError::invalid_table_format(
                &format!("The {source} table header row is missing or unreadable."),
                source,
                "csv",
            )
        })?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    let mut rows = Vec::new();
    for result_row in reader.records() {
        let record = result_row.map_err(|_| {
            ClientError::invalid_table_format(
                &format!("Rows in the {source} table are malformed or not UTF-8."),
                source,
                "csv",
            )
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(|value| value.to_string()).collect());
    }

    Ok(RawTable::new(headers, rows))
}

fn cell_text(value: Option<&Value>) -> String {
    let Some(current) = value else {
        return String::new();
    };

    match current {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

fn looks_like_ndjson(content: &str) -> bool {
    let lines = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<&str>>();
    if lines.len() < 2 {
        return false;
    }

    lines.iter().all(|line| {
        let parsed = serde_json::from_str::<Value>(line.trim());
        if let Ok(value) = parsed {
            return value.is_object();
        }
        false
    })
}
