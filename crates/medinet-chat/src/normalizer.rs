//! Webhook response normalization.
//!
//! Upstream assistants answer in several shapes: a direct `{ message, actions }`
//! object, an `{ output }` wrapper whose value is itself a JSON document
//! serialized to a string, or a one-element batch array of either. Everything
//! is reduced to a [`ChatReply`] here so the rest of the crate never touches
//! untyped payloads.

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{ActionItem, ActionKind, ChatReply};

// =============================================================================
// Decoding boundary
// =============================================================================

/// A payload whose shape was recognized.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    pub message: Option<String>,
    pub actions: Vec<ActionItem>,
}

impl WebhookPayload {
    pub fn into_reply(self) -> ChatReply {
        ChatReply::new(self.message.unwrap_or_default(), self.actions)
    }
}

/// `output` carried text that was not a JSON object.
///
/// Not an error: the raw text becomes the message body.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationFallback {
    pub raw: String,
    pub reason: String,
    pub actions: Vec<ActionItem>,
}

impl NormalizationFallback {
    pub fn into_reply(self) -> ChatReply {
        ChatReply::new(self.raw, self.actions)
    }
}

/// Decode an upstream payload into its typed form.
pub fn decode(payload: &Value) -> Result<WebhookPayload, NormalizationFallback> {
    let payload = unwrap_batch(payload);
    let top = payload.as_object();

    match payload.get("output") {
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(parsed)) => Ok(merge_layers(Some(&parsed), top)),
            Ok(_) => Err(fallback(raw, top, "output is not a JSON object")),
            Err(e) => Err(fallback(raw, top, &e.to_string())),
        },
        Some(Value::Object(parsed)) => Ok(merge_layers(Some(parsed), top)),
        _ => Ok(merge_layers(None, top)),
    }
}

/// Normalize any upstream payload into `{ message, actions }`. Never fails.
pub fn normalize(payload: &Value) -> ChatReply {
    match decode(payload) {
        Ok(decoded) => decoded.into_reply(),
        Err(fallback) => {
            debug!(reason = %fallback.reason, "Webhook output is not JSON; using raw text");
            fallback.into_reply()
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Batch runners wrap the answer in an array; only the first item counts.
fn unwrap_batch(payload: &Value) -> &Value {
    match payload {
        Value::Array(items) => items.first().unwrap_or(&Value::Null),
        other => other,
    }
}

fn merge_layers(
    parsed: Option<&Map<String, Value>>,
    top: Option<&Map<String, Value>>,
) -> WebhookPayload {
    let message = parsed
        .and_then(|p| str_field(p, "message"))
        .or_else(|| top.and_then(|t| str_field(t, "message")));

    let raw_actions = parsed
        .and_then(|p| p.get("actions"))
        .and_then(Value::as_array)
        .or_else(|| top.and_then(|t| t.get("actions")).and_then(Value::as_array));

    WebhookPayload {
        message,
        actions: raw_actions.map(|a| map_actions(a)).unwrap_or_default(),
    }
}

fn fallback(raw: &str, top: Option<&Map<String, Value>>, reason: &str) -> NormalizationFallback {
    let actions = top
        .and_then(|t| t.get("actions"))
        .and_then(Value::as_array)
        .map(|a| map_actions(a))
        .unwrap_or_default();

    NormalizationFallback {
        raw: raw.to_string(),
        reason: reason.to_string(),
        actions,
    }
}

fn map_actions(raw: &[Value]) -> Vec<ActionItem> {
    raw.iter()
        .filter_map(|entry| match entry {
            Value::Object(obj) => Some(map_action(obj)),
            other => {
                debug!(entry = %other, "Skipping non-object action entry");
                None
            }
        })
        .collect()
}

fn map_action(obj: &Map<String, Value>) -> ActionItem {
    let label = str_field(obj, "label")
        .or_else(|| str_field(obj, "text"))
        .unwrap_or_default();

    let parameters = obj.get("parameters").and_then(Value::as_object).cloned();

    let query = str_field(obj, "query")
        .or_else(|| parameters.as_ref().and_then(|p| str_field(p, "query")))
        .unwrap_or_else(|| label.clone());

    let kind = str_field(obj, "type")
        .map(ActionKind::from)
        .unwrap_or_else(|| ActionKind::Other(String::new()));

    let filters = obj
        .get("filters")
        .and_then(|f| serde_json::from_value(f.clone()).ok());

    ActionItem {
        kind,
        label,
        query: Some(query),
        filters,
        target: str_field(obj, "target"),
        parameters,
    }
}

/// A non-empty string field.
fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
