//! Tool modules for the Pincer agent.

pub mod base;
pub mod exec;
pub mod fetch;
pub mod filesystem;
pub mod hash;
pub mod json;
pub mod memory;
pub mod registry;

pub use base::{optional_str, optional_usize, require_str, Tool};
pub use registry::{ToolEntry, ToolNamespace, ToolRegistry};
