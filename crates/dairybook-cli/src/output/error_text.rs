use dairybook_client::ClientError;
use serde_json::Value;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "Could not finish the command.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    if let Some((command, section)) = help_pointer(error) {
        lines.push(format!("  Help:     `{command}`, section \"{section}\""));
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

fn help_pointer(error: &ClientError) -> Option<(&str, &str)> {
    let data = error.data.as_ref()?;
    let command = data.get("help_command").and_then(Value::as_str)?;
    let section = data.get("help_section_title").and_then(Value::as_str)?;
    Some((command, section))
}
