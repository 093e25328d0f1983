//! Memory namespace — `read`, `write`, and `append` over the shared journal.
//!
//! The journal itself serializes concurrent access; these sub-tools are thin
//! adapters that expose it through the tool-call surface.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use pincer_core::MemoryJournal;

use super::base::{require_str, Tool};
use super::registry::ToolNamespace;

/// Build the `memory` namespace over a shared journal.
pub fn memory_namespace(journal: Arc<MemoryJournal>) -> ToolNamespace {
    ToolNamespace::new("memory")
        .insert(Arc::new(MemoryReadTool {
            journal: journal.clone(),
        }))
        .insert(Arc::new(MemoryWriteTool {
            journal: journal.clone(),
        }))
        .insert(Arc::new(MemoryAppendTool { journal }))
}

/// Reads the whole journal. Payload: `{content}`.
pub struct MemoryReadTool {
    journal: Arc<MemoryJournal>,
}

#[async_trait]
impl Tool for MemoryReadTool {
    fn name(&self) -> &str {
        "read"
    }

    fn description(&self) -> &str {
        "Read the whole memory journal."
    }

    async fn execute(&self, _args: &[Value]) -> anyhow::Result<Value> {
        let content = self.journal.read().await?;
        Ok(json!({"content": content}))
    }
}

/// Overwrites the whole journal. Args: `[content]`.
pub struct MemoryWriteTool {
    journal: Arc<MemoryJournal>,
}

#[async_trait]
impl Tool for MemoryWriteTool {
    fn name(&self) -> &str {
        "write"
    }

    fn description(&self) -> &str {
        "Overwrite the whole memory journal."
    }

    async fn execute(&self, args: &[Value]) -> anyhow::Result<Value> {
        let content = require_str(args, 0, "content")?;
        self.journal.write(&content).await?;
        Ok(Value::Null)
    }
}

/// Appends a timestamped block. Args: `[text]`.
pub struct MemoryAppendTool {
    journal: Arc<MemoryJournal>,
}

#[async_trait]
impl Tool for MemoryAppendTool {
    fn name(&self) -> &str {
        "append"
    }

    fn description(&self) -> &str {
        "Append a timestamped block to the memory journal."
    }

    async fn execute(&self, args: &[Value]) -> anyhow::Result<Value> {
        let text = require_str(args, 0, "text")?;
        self.journal.append(&text).await?;
        Ok(Value::Null)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn journal() -> (tempfile::TempDir, Arc<MemoryJournal>) {
        let dir = tempfile::tempdir().unwrap();
        let journal = Arc::new(MemoryJournal::open(dir.path().join("MEMORY.md")).unwrap());
        (dir, journal)
    }

    #[test]
    fn namespace_has_three_subtools() {
        let (_dir, journal) = journal();
        let ns = memory_namespace(journal);
        assert_eq!(ns.name(), "memory");
        assert_eq!(ns.subtool_names(), vec!["append", "read", "write"]);
    }

    #[tokio::test]
    async fn append_then_read() {
        let (_dir, journal) = journal();
        let ns = memory_namespace(journal);

        ns.get("append")
            .unwrap()
            .execute(&[json!("remember this")])
            .await
            .unwrap();

        let payload = ns.get("read").unwrap().execute(&[]).await.unwrap();
        assert!(payload["content"].as_str().unwrap().contains("remember this"));
    }

    #[tokio::test]
    async fn write_overwrites() {
        let (_dir, journal) = journal();
        let ns = memory_namespace(journal);

        ns.get("write")
            .unwrap()
            .execute(&[json!("clean slate")])
            .await
            .unwrap();

        let payload = ns.get("read").unwrap().execute(&[]).await.unwrap();
        assert_eq!(payload["content"], "clean slate");
    }

    #[tokio::test]
    async fn append_missing_text_is_error() {
        let (_dir, journal) = journal();
        let ns = memory_namespace(journal);
        assert!(ns.get("append").unwrap().execute(&[]).await.is_err());
    }
}
