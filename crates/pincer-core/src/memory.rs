//! Memory journal — the single shared append-only document.
//!
//! The journal is a flat Markdown file (`MEMORY.md` under the data dir)
//! shared by every connection. It is read in full, overwritten in full, or
//! appended to as a timestamped `## <RFC 3339>` block.
//!
//! All mutation goes through one async mutex so two concurrent appends can
//! never interleave at the byte level; reads take the same lock to avoid
//! observing a half-written file.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

/// A single line matched by [`MemoryJournal::search`].
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MatchLine {
    /// 1-based line number within the journal.
    pub line: usize,
    pub content: String,
}

/// Mutex-guarded handle to the journal file.
pub struct MemoryJournal {
    path: PathBuf,
    lock: Mutex<()>,
}

impl MemoryJournal {
    /// Open (or bootstrap) the journal at `path`.
    ///
    /// Creates the parent directory and, on first run, seeds the file with a
    /// header template so `read` never reports a missing file.
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            let template = format!(
                "# MEMORY.md\n\nPincer journal\nCreated: {}\n",
                Utc::now().to_rfc3339()
            );
            std::fs::write(&path, template)?;
            debug!(path = %path.display(), "bootstrapped memory journal");
        }
        Ok(MemoryJournal {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Path to the journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole journal.
    pub async fn read(&self) -> std::io::Result<String> {
        let _guard = self.lock.lock().await;
        std::fs::read_to_string(&self.path)
    }

    /// Overwrite the whole journal.
    pub async fn write(&self, content: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock().await;
        std::fs::write(&self.path, content)
    }

    /// Append `text` as a timestamped block.
    pub async fn append(&self, text: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock().await;
        let mut content = std::fs::read_to_string(&self.path).unwrap_or_default();
        let entry = format!("\n## {}\n\n{}\n", Utc::now().to_rfc3339(), text);
        content.push_str(&entry);
        std::fs::write(&self.path, content)
    }

    /// Case-insensitive substring search over journal lines.
    pub async fn search(&self, query: &str) -> std::io::Result<Vec<MatchLine>> {
        let content = self.read().await?;
        let needle = query.to_lowercase();
        Ok(content
            .lines()
            .enumerate()
            .filter(|(_, line)| line.to_lowercase().contains(&needle))
            .map(|(i, line)| MatchLine {
                line: i + 1,
                content: line.to_string(),
            })
            .collect())
    }

    /// The last `count` `## `-headed entries, oldest first.
    pub async fn last_entries(&self, count: usize) -> std::io::Result<Vec<String>> {
        let content = self.read().await?;
        let entries: Vec<String> = content
            .split("\n## ")
            .skip(1) // leading header block is not an entry
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        let start = entries.len().saturating_sub(count);
        Ok(entries[start..].to_vec())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
