//! Pincer agent — the task dispatcher and its tool/skill registries.
//!
//! A [`Task`](pincer_core::Task) resolves to one of three paths:
//!
//! - `tool-call` — a registered tool (flat, or a namespace of sub-tools)
//! - `skill-call` — a named composite behavior with access to the full
//!   tool registry
//! - `llm-call` — a round-trip through the configured text-generation
//!   provider
//!
//! Every path yields exactly one [`Envelope`](pincer_core::Envelope).

pub mod dispatcher;
pub mod error;
pub mod skills;
pub mod tools;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use skills::{Skill, SkillRegistry};
pub use tools::{Tool, ToolEntry, ToolNamespace, ToolRegistry};
