//! Parsing for agent-browser `--json` output
//!
//! agent-browser wraps command results in a `{ success, data, error }`
//! envelope. The eval result sits either in `data.result` or directly in
//! `data`, and may be the value itself or its JSON text.

use serde::Deserialize;
use serde_json::Value;

/// JSON envelope printed by agent-browser
#[derive(Debug, Clone, Deserialize)]
pub struct CommandOutput {
    /// Missing means the CLI did not say; only an explicit `false` is a failure
    #[serde(default)]
    pub success: Option<bool>,
    /// Command payload
    #[serde(default)]
    pub data: Option<Value>,
    /// Failure message
    #[serde(default)]
    pub error: Option<String>,
}

impl CommandOutput {
    /// Parse stdout; non-JSON output is treated as a bare result string
    pub fn parse(stdout: &str) -> Self {
        let trimmed = stdout.trim();
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) if map.contains_key("success") || map.contains_key("data") => {
                serde_json::from_value(Value::Object(map)).unwrap_or_else(|_| Self::bare(trimmed))
            }
            Ok(value) => Self {
                success: None,
                data: Some(value),
                error: None,
            },
            Err(_) => Self::bare(trimmed),
        }
    }

    fn bare(text: &str) -> Self {
        Self {
            success: None,
            data: Some(Value::String(text.to_string())),
            error: None,
        }
    }

    /// Whether the CLI reported failure
    pub fn failed(&self) -> bool {
        self.success == Some(false)
    }

    /// The eval result value
    pub fn result(&self) -> Option<&Value> {
        match &self.data {
            Some(Value::Object(map)) if map.contains_key("result") => map.get("result"),
            other => other.as_ref(),
        }
    }
}

/// Build the script that collects `innerHTML` of every match, in document order
pub fn inner_html_script(selector: &str) -> String {
    // serde_json string encoding doubles as a JS string literal
    let literal = Value::String(selector.to_string()).to_string();
    format!(
        "JSON.stringify(Array.from(document.querySelectorAll({}), el => el.innerHTML))",
        literal
    )
}

/// Decode the eval result into the snippet list
pub fn decode_snippets(value: &Value) -> std::result::Result<Vec<String>, String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(format!("expected a string, got {}", other)),
            })
            .collect(),
        Value::String(text) => {
            let inner: Value = serde_json::from_str(text)
                .map_err(|e| format!("result is not a JSON array: {}", e))?;
            match inner {
                Value::Array(_) => decode_snippets(&inner),
                other => Err(format!("expected an array, got {}", other)),
            }
        }
        Value::Null => Err("query returned no result".to_string()),
        other => Err(format!("expected an array, got {}", other)),
    }
}
