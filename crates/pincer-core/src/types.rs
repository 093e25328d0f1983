//! Core types — the result envelope and the task model.
//!
//! Tasks arrive over the wire as a tagged union on `kind`; every dispatched
//! task produces exactly one `Envelope`, never zero, never more than one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────
// Envelope
// ─────────────────────────────────────────────

/// The uniform result shape every tool/skill/LLM invocation produces.
///
/// Serializes as `{"success": true, ...payload}` or
/// `{"success": false, "error": "..."}`. Payload fields are flattened to the
/// top level so a hash result reads `{"success": true, "hash": "ab12…"}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Envelope {
    /// Success envelope from a JSON payload.
    ///
    /// An object contributes its fields directly; any other value is placed
    /// under a `"result"` key so the envelope stays a flat object.
    pub fn ok(payload: Value) -> Self {
        let payload = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                map
            }
        };
        Envelope {
            success: true,
            error: None,
            payload,
        }
    }

    /// Success envelope with no payload.
    pub fn ok_empty() -> Self {
        Envelope {
            success: true,
            error: None,
            payload: Map::new(),
        }
    }

    /// Failure envelope carrying a human-readable error string.
    pub fn fail(error: impl Into<String>) -> Self {
        Envelope {
            success: false,
            error: Some(error.into()),
            payload: Map::new(),
        }
    }

    /// Look up a payload field by key.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

// ─────────────────────────────────────────────
// Task
// ─────────────────────────────────────────────

/// A unit of work for the agent dispatcher.
///
/// Constructed from an inbound `agent` frame, consumed by `dispatch`,
/// discarded after producing its envelope.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum Task {
    /// Free-form text generation through the configured LLM provider.
    #[serde(rename = "llm-call")]
    LlmCall {
        prompt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<Value>,
    },

    /// Invocation of a registered tool with positional arguments.
    #[serde(rename = "tool-call")]
    ToolCall {
        name: String,
        #[serde(default)]
        args: Vec<Value>,
    },

    /// Invocation of a registered skill with positional arguments.
    #[serde(rename = "skill-call")]
    SkillCall {
        name: String,
        #[serde(default)]
        args: Vec<Value>,
    },
}

/// The payload of an inbound `agent` frame: the task plus optional
/// caller-supplied context passed through to the LLM path.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentPayload {
    pub task: Task,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
