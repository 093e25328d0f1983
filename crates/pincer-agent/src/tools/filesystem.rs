//! Filesystem tools — whole-file read and write.

use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::base::{require_str, Tool};

// ─────────────────────────────────────────────
// ReadTool
// ─────────────────────────────────────────────

/// Reads and returns the entire content of a file.
///
/// Args: `[path]`. Payload: `{content}`.
pub struct ReadTool;

#[async_trait]
impl Tool for ReadTool {
    fn name(&self) -> &str {
        "read"
    }

    fn description(&self) -> &str {
        "Read the contents of a file at the given path."
    }

    async fn execute(&self, args: &[Value]) -> anyhow::Result<Value> {
        let path_str = require_str(args, 0, "path")?;
        let path = Path::new(&path_str);

        if !path.exists() {
            anyhow::bail!("file not found: {}", path.display());
        }
        if !path.is_file() {
            anyhow::bail!("not a file: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
        Ok(json!({"content": content}))
    }
}

// ─────────────────────────────────────────────
// WriteTool
// ─────────────────────────────────────────────

/// Creates or overwrites a file with the given content.
///
/// Args: `[path, content]`. Parent directories are created automatically.
pub struct WriteTool;

#[async_trait]
impl Tool for WriteTool {
    fn name(&self) -> &str {
        "write"
    }

    fn description(&self) -> &str {
        "Write content to a file, creating parent directories as needed."
    }

    async fn execute(&self, args: &[Value]) -> anyhow::Result<Value> {
        let path_str = require_str(args, 0, "path")?;
        let content = require_str(args, 1, "content")?;
        let path = Path::new(&path_str);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", parent.display()))?;
        }
        std::fs::write(path, &content)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;

        Ok(json!({"path": path_str, "bytes": content.len()}))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
