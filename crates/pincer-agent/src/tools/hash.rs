//! Hash tool — digest a text argument.

use async_trait::async_trait;
use serde_json::{json, Value};
use sha2::{Digest, Sha256, Sha512};

use super::base::{optional_str, require_str, Tool};

/// Computes a hex digest of a text input.
///
/// Args: `[text, algorithm?]` — algorithm defaults to `"sha256"`;
/// `"sha512"` is also supported.
/// Payload: `{hash, algorithm}`.
pub struct HashTool;

#[async_trait]
impl Tool for HashTool {
    fn name(&self) -> &str {
        "hash"
    }

    fn description(&self) -> &str {
        "Compute a hex digest (sha256 or sha512) of the given text."
    }

    async fn execute(&self, args: &[Value]) -> anyhow::Result<Value> {
        let text = require_str(args, 0, "text")?;
        let algorithm = optional_str(args, 1).unwrap_or_else(|| "sha256".to_string());

        let hash = match algorithm.as_str() {
            "sha256" => format!("{:x}", Sha256::digest(text.as_bytes())),
            "sha512" => format!("{:x}", Sha512::digest(text.as_bytes())),
            other => anyhow::bail!("unsupported hash algorithm: {other}"),
        };

        Ok(json!({"hash": hash, "algorithm": algorithm}))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
