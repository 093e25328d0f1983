//! Tool trait — the abstract interface every capability must implement.
//!
//! Tools are invoked by name with **positional** JSON arguments and return a
//! JSON payload. They never build their own envelope: a tool body that fails
//! returns `Err`, and the dispatcher converts that into
//! `{success:false, error}`.

use async_trait::async_trait;
use serde_json::Value;

/// Every agent tool implements this trait.
///
/// The dispatcher resolves tools by `name()` and invokes `execute()` with
/// the task's positional args. The returned `Value` becomes the envelope
/// payload — return an object so its fields land at the envelope top level.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used in `tool-call` tasks (e.g. `"hash"`).
    fn name(&self) -> &str;

    /// Short human-readable description.
    fn description(&self) -> &str;

    /// Execute the tool with positional arguments.
    async fn execute(&self, args: &[Value]) -> anyhow::Result<Value>;
}

// ─────────────────────────────────────────────
// Positional-arg helpers
// ─────────────────────────────────────────────

/// Extract a required string argument at `idx`, with a user-friendly error.
pub fn require_str(args: &[Value], idx: usize, what: &str) -> anyhow::Result<String> {
    args.get(idx)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("missing or non-string argument {idx} ({what})"))
}

/// Extract an optional string argument at `idx`.
pub fn optional_str(args: &[Value], idx: usize) -> Option<String> {
    args.get(idx).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Extract an optional non-negative integer argument at `idx`.
pub fn optional_usize(args: &[Value], idx: usize) -> Option<usize> {
    args.get(idx).and_then(|v| v.as_u64()).map(|n| n as usize)
}
