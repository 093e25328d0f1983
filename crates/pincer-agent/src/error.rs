//! Dispatch error taxonomy.
//!
//! These are *routing* failures — the task never reached an executable
//! target. Execution failures (a tool body erroring, a provider timing out)
//! are not errors at this level; the dispatcher normalizes them into
//! `{success:false, error}` envelopes.

use thiserror::Error;

/// A task could not be resolved to an executable target.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// No tool registered under this name.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// No skill registered under this name.
    #[error("skill not found: {0}")]
    SkillNotFound(String),

    /// The name resolved to a namespace but `args[0]` named no sub-tool.
    #[error("invalid tool: '{tool}' has no sub-tool '{sub}'")]
    InvalidTool { tool: String, sub: String },
}
