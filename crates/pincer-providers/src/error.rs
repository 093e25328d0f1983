//! Provider error taxonomy.
//!
//! Every failure on the `llm-call` path is a typed `ProviderError`; the
//! dispatcher converts it into a `{success:false, error}` envelope rather
//! than embedding error text in a success-shaped reply.

use thiserror::Error;

/// Failures from the LLM provider layer.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No provider with this name, or the named provider has no API key.
    #[error("provider '{0}' is not configured (missing API key?)")]
    NotConfigured(String),

    /// The HTTP round-trip itself failed (connect, timeout, TLS).
    #[error("request to {provider} failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{provider} returned {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("malformed response from {provider}: {detail}")]
    Malformed {
        provider: &'static str,
        detail: String,
    },
}
