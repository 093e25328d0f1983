//! JSON namespace — `parse` and `stringify` sub-tools.
//!
//! Registered under the top-level name `json`; a `tool-call` with
//! `args[0] == "parse"` routes to [`JsonParseTool`], and so on.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::base::{require_str, Tool};
use super::registry::ToolNamespace;
use std::sync::Arc;

/// Build the `json` namespace.
pub fn json_namespace() -> ToolNamespace {
    ToolNamespace::new("json")
        .insert(Arc::new(JsonParseTool))
        .insert(Arc::new(JsonStringifyTool))
}

// ─────────────────────────────────────────────
// parse
// ─────────────────────────────────────────────

/// Parses a JSON text into a value.
///
/// Args: `[text]`. Payload: `{value}`.
pub struct JsonParseTool;

#[async_trait]
impl Tool for JsonParseTool {
    fn name(&self) -> &str {
        "parse"
    }

    fn description(&self) -> &str {
        "Parse a JSON string into a structured value."
    }

    async fn execute(&self, args: &[Value]) -> anyhow::Result<Value> {
        let text = require_str(args, 0, "text")?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("invalid JSON: {e}"))?;
        Ok(json!({"value": value}))
    }
}

// ─────────────────────────────────────────────
// stringify
// ─────────────────────────────────────────────

/// Serializes a value to JSON text.
///
/// Args: `[value, pretty?]`. Payload: `{text}`.
pub struct JsonStringifyTool;

#[async_trait]
impl Tool for JsonStringifyTool {
    fn name(&self) -> &str {
        "stringify"
    }

    fn description(&self) -> &str {
        "Serialize a value to a JSON string, optionally pretty-printed."
    }

    async fn execute(&self, args: &[Value]) -> anyhow::Result<Value> {
        let value = args
            .first()
            .ok_or_else(|| anyhow::anyhow!("missing argument 0 (value)"))?;
        let pretty = args.get(1).and_then(|v| v.as_bool()).unwrap_or(false);

        let text = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json!({"text": text}))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
