//! LLM Provider trait — the abstraction the dispatcher depends on.
//!
//! The main implementation is `HttpProvider`, which handles any
//! OpenAI-compatible `/chat/completions` endpoint.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// `context` is optional caller-supplied JSON, surfaced to the model as
    /// a system message. On any failure the typed `ProviderError` is
    /// returned — never an error string dressed as content.
    async fn generate(&self, prompt: &str, context: Option<&Value>)
        -> Result<String, ProviderError>;

    /// The model this provider instance targets.
    fn model(&self) -> &str;

    /// Display name for logging and envelope tagging.
    fn display_name(&self) -> &str;
}
