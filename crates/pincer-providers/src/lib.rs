//! LLM provider layer for Pincer.
//!
//! The `llm-call` dispatch path talks to one external text-generation
//! provider, chosen by configuration (`llm.provider`).
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`] — trait the dispatcher depends on
//! - [`registry`] — static specs for the supported providers
//! - [`http_provider::HttpProvider`] — generic OpenAI-compatible HTTP client
//! - [`http_provider::create_provider`] — builder from the loaded config

pub mod error;
pub mod http_provider;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use error::ProviderError;
pub use http_provider::{create_provider, HttpProvider};
pub use registry::{ProviderSpec, PROVIDERS};
pub use traits::LlmProvider;
