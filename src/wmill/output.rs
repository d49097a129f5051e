//! Structured results scraped from CLI output

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Parse the JSON document the CLI prints after its progress lines.
///
/// Everything from the first `{` to the end is taken as JSON. Output without
/// a parsable object yields an empty object.
pub fn extract_json(output: &str) -> Value {
    let Some(start) = output.find('{') else {
        tracing::debug!("No JSON found in CLI output");
        return Value::Object(Map::new());
    };
    match serde_json::from_str::<Value>(output[start..].trim()) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Failed to parse CLI output as JSON: {}", e);
            Value::Object(Map::new())
        }
    }
}

/// One entry of a sync change list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Change {
    pub fn new(kind: &str, path: &str) -> Self {
        Self {
            kind: kind.to_string(),
            path: path.to_string(),
            extra: Map::new(),
        }
    }
}

/// Result of `gitsync-settings ... --diff --json-output`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsDiff {
    #[serde(rename = "hasChanges", default)]
    pub has_changes: bool,
    /// Settings as stored in the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of `sync pull|push --dry-run --json-output`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncChanges {
    #[serde(default, deserialize_with = "change_list")]
    pub changes: Vec<Change>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(
        rename = "settingsDiffResult",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub settings_diff: Option<SettingsDiff>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A change list the CLI may report as `null`, `false` or `0` when empty
fn change_list<'de, D>(deserializer: D) -> Result<Vec<Change>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(Vec::new()),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(Vec::new()),
        Value::String(s) if s.is_empty() => Ok(Vec::new()),
        list @ Value::Array(_) => serde_json::from_value(list).map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("expected a change list, got {}", other))),
    }
}

impl SyncChanges {
    pub fn mentions(&self, path: &str) -> bool {
        self.changes.iter().any(|c| c.path == path)
    }

    /// Append a change and bump the total
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
        self.total = Some(self.total.unwrap_or(0) + 1);
    }
}
