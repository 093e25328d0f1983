//! Tool Registry — thread-safe store of flat tools and namespaces.
//!
//! Entries are an explicit tagged union: a name maps to either one callable
//! tool or a namespace of named sub-tools (e.g. `json` → `parse`,
//! `stringify`). Resolution is pattern matching on the variant, never
//! runtime shape inspection.
//!
//! The registry is populated once at startup and immutable afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::base::Tool;

// ─────────────────────────────────────────────
// Entries
// ─────────────────────────────────────────────

/// A namespace of named sub-tools registered under one top-level name.
pub struct ToolNamespace {
    name: String,
    subtools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolNamespace {
    /// Create an empty namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subtools: HashMap::new(),
        }
    }

    /// Namespace name (the top-level registry key).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a sub-tool, keyed by its own `name()`.
    pub fn insert(mut self, tool: Arc<dyn Tool>) -> Self {
        self.subtools.insert(tool.name().to_string(), tool);
        self
    }

    /// Look up a sub-tool.
    pub fn get(&self, sub: &str) -> Option<&Arc<dyn Tool>> {
        self.subtools.get(sub)
    }

    /// Sub-tool names, sorted for determinism.
    pub fn subtool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.subtools.keys().cloned().collect();
        names.sort();
        names
    }
}

/// One registry entry — a flat callable or a namespace.
pub enum ToolEntry {
    Flat(Arc<dyn Tool>),
    Namespace(ToolNamespace),
}

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Stores tool entries keyed by name.
pub struct ToolRegistry {
    entries: HashMap<String, ToolEntry>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a flat tool. Overwrites any previous entry with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        info!(tool = tool.name(), "registered tool");
        self.entries
            .insert(tool.name().to_string(), ToolEntry::Flat(tool));
    }

    /// Register a namespace. Overwrites any previous entry with the same name.
    pub fn register_namespace(&mut self, namespace: ToolNamespace) {
        info!(
            tool = namespace.name(),
            subtools = ?namespace.subtool_names(),
            "registered tool namespace"
        );
        self.entries
            .insert(namespace.name().to_string(), ToolEntry::Namespace(namespace));
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.entries.get(name)
    }

    /// Check if a name is registered.
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names of all registered entries, sorted for determinism.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
