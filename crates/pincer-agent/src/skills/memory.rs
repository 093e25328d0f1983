//! Memory skill — journal operations behind a single `skill-call` name.
//!
//! Operations (selected by `args[0]`):
//! - `read` — whole journal → `{content}`
//! - `write` — overwrite with `args[1]`
//! - `append` — timestamped block from `args[1]`
//! - `search` — line matches for `args[1]` → `{matches}`
//! - `last` — last N entries (`args[1]`, default 5) → `{entries}`

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use pincer_core::MemoryJournal;

use crate::tools::ToolRegistry;

use super::Skill;

/// Default entry count for the `last` operation.
const DEFAULT_LAST_COUNT: usize = 5;

/// The journal skill.
pub struct MemorySkill {
    journal: Arc<MemoryJournal>,
}

impl MemorySkill {
    /// Create the skill over a shared journal.
    pub fn new(journal: Arc<MemoryJournal>) -> Self {
        Self { journal }
    }
}

#[async_trait]
impl Skill for MemorySkill {
    fn name(&self) -> &str {
        "memory"
    }

    fn description(&self) -> &str {
        "Read, write, append, search, and summarize the shared memory journal."
    }

    async fn execute(&self, args: &[Value], _tools: &ToolRegistry) -> anyhow::Result<Value> {
        let operation = args
            .first()
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("missing operation argument"))?;

        match operation {
            "read" => {
                let content = self.journal.read().await?;
                Ok(json!({"content": content}))
            }
            "write" => {
                let content = args
                    .get(1)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow::anyhow!("write requires content"))?;
                self.journal.write(content).await?;
                Ok(Value::Null)
            }
            "append" => {
                let text = args
                    .get(1)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow::anyhow!("append requires text"))?;
                self.journal.append(text).await?;
                Ok(Value::Null)
            }
            "search" => {
                let query = args
                    .get(1)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow::anyhow!("search requires a query"))?;
                let matches = self.journal.search(query).await?;
                Ok(json!({"matches": matches}))
            }
            "last" => {
                let count = args
                    .get(1)
                    .and_then(|v| v.as_u64())
                    .map(|n| n as usize)
                    .unwrap_or(DEFAULT_LAST_COUNT);
                let entries = self.journal.last_entries(count).await?;
                Ok(json!({"entries": entries}))
            }
            other => anyhow::bail!("unknown memory operation: {other}"),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
