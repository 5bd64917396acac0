use std::io;

use dairybook_client::contracts::envelope::failure_from_error;
use dairybook_client::{ClientError, SuccessEnvelope};
use serde::Serialize;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use dairybook_client::{ClientError, SuccessEnvelope};
    use serde_json::{Value, json};

    use super::{render_error_json, render_success_json};

    fn success(command: &str, data: Value, notices: Vec<String>) -> SuccessEnvelope {
        SuccessEnvelope {
            ok: true,
            command: command.to_string(),
            version: "0.1.0".to_string(),
            data,
            notices,
        }
    }

    #[test]
    fn success_json_keeps_the_envelope() {
        let payload = success(
            "customers",
            json!({"customers": [{"customer_id": "CUST001"}], "sources": []}),
            vec!["no morning or evening table given".to_string()],
        );

        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(true));
                assert_eq!(value["command"], "customers");
                assert_eq!(value["data"]["customers"][0]["customer_id"], "CUST001");
                assert_eq!(value["notices"][0], "no morning or evening table given");
            }
        }
    }

    #[test]
    fn success_json_omits_empty_notices() {
        let rendered = render_success_json(&success("production", json!({"total_qty": 0.0}), Vec::new()));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(!text.contains("notices"));
        }
    }

    #[test]
    fn error_json_uses_failure_envelope() {
        let error = ClientError::new("source_unreadable", "missing", vec!["check the path".to_string()]);
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(false));
                assert_eq!(value["error"]["code"], "source_unreadable");
                assert_eq!(value["error"]["recovery_steps"][0], "check the path");
            }
        }
    }
}
