//! Pincer core — shared types, wire protocol, configuration, and the
//! memory journal.
//!
//! Everything in this crate is pure plumbing shared by the gateway, the
//! agent dispatcher, and the CLI: no I/O loops live here, only the shapes
//! they exchange and the journal they share.

pub mod config;
pub mod memory;
pub mod protocol;
pub mod types;
pub mod utils;

pub use memory::MemoryJournal;
pub use protocol::{ClientFrame, MemoryOperation, ServerFrame};
pub use types::{AgentPayload, Envelope, Task};
