//! Skills — named composite behaviors layered over the tool registry.
//!
//! A skill is invoked like a tool but receives the full tool registry:
//! capability delegation, not isolation. The set is small and registered
//! explicitly at startup.

pub mod memory;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::tools::ToolRegistry;

/// Every skill implements this trait.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Unique name used in `skill-call` tasks (e.g. `"memory"`).
    fn name(&self) -> &str;

    /// Short human-readable description.
    fn description(&self) -> &str;

    /// Execute the skill with positional args and access to all tools.
    async fn execute(&self, args: &[Value], tools: &ToolRegistry) -> anyhow::Result<Value>;
}

/// Stores skills keyed by name.
pub struct SkillRegistry {
    skills: HashMap<String, Arc<dyn Skill>>,
}

impl SkillRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            skills: HashMap::new(),
        }
    }

    /// Register a skill. Overwrites any previous skill with the same name.
    pub fn register(&mut self, skill: Arc<dyn Skill>) {
        info!(skill = skill.name(), "registered skill");
        self.skills.insert(skill.name().to_string(), skill);
    }

    /// Look up a skill by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Skill>> {
        self.skills.get(name)
    }

    /// Check if a skill is registered.
    pub fn has(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    /// Names of all registered skills, sorted for determinism.
    pub fn skill_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.skills.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered skills.
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
