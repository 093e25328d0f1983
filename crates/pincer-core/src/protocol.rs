//! Wire protocol — JSON frames exchanged between the gateway and clients.
//!
//! Inbound (`ClientFrame`) and outbound (`ServerFrame`) messages are tagged
//! unions on a `type` field. Field names on the wire are camelCase where the
//! protocol says so (`clientId`); everything else stays lowercase.

use serde::{Deserialize, Serialize};

use crate::types::{AgentPayload, Envelope};

// ─────────────────────────────────────────────
// Inbound frames
// ─────────────────────────────────────────────

/// A message from a client to the gateway.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ClientFrame {
    /// Liveness probe; answered with `pong` to the sender only.
    #[serde(rename = "ping")]
    Ping,

    /// Agent task dispatch.
    #[serde(rename = "agent")]
    Agent { payload: AgentPayload },

    /// Memory journal operation.
    #[serde(rename = "memory")]
    Memory {
        operation: MemoryOperation,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<String>,
    },
}

/// The two journal operations exposed over the wire.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemoryOperation {
    Read,
    Append,
}

// ─────────────────────────────────────────────
// Outbound frames
// ─────────────────────────────────────────────

/// A message from the gateway to a client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ServerFrame {
    /// Handshake sent once on connect, carrying the assigned identity.
    #[serde(rename = "hello")]
    Hello {
        #[serde(rename = "clientId")]
        client_id: String,
        timestamp: String,
    },

    /// Reply to `ping`. `time` is unix milliseconds.
    #[serde(rename = "pong")]
    Pong { time: i64 },

    /// Reply to `agent` — the dispatch result envelope.
    #[serde(rename = "agent-response")]
    AgentResponse { result: Envelope },

    /// Reply to `memory` — the journal content (or `"OK"` for appends).
    #[serde(rename = "memory-response")]
    MemoryResponse { memory: String },

    /// Per-sender error reply. Never broadcast.
    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerFrame {
    /// Build an error frame.
    pub fn error(message: impl Into<String>) -> Self {
        ServerFrame::Error {
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
