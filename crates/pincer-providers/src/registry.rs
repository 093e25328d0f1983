//! Provider registry — static specs for the supported LLM backends.
//!
//! Unlike model-keyword routing, Pincer selects the provider by name from
//! configuration (`llm.provider` / `PINCER_LLM__PROVIDER`). The spec only
//! carries connection metadata: display name, key env var, default API base.

use std::collections::HashMap;

use pincer_core::config::schema::ProviderConfig;

use crate::error::ProviderError;

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// Static specification describing one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Internal name, matching the config key (e.g. `"openrouter"`).
    pub name: &'static str,
    /// Human-readable name for logs. E.g. `"OpenRouter"`.
    pub display_name: &'static str,
    /// Environment variable conventionally holding the API key.
    pub env_key: &'static str,
    /// Default API base URL.
    pub default_api_base: &'static str,
    /// Whether this backend honors the OpenRouter attribution headers
    /// (`HTTP-Referer`, `X-Title`).
    pub attribution_headers: bool,
}

/// Supported provider specifications.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "anthropic",
        display_name: "Anthropic",
        env_key: "ANTHROPIC_API_KEY",
        default_api_base: "https://api.anthropic.com/v1",
        attribution_headers: false,
    },
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI",
        env_key: "OPENAI_API_KEY",
        default_api_base: "https://api.openai.com/v1",
        attribution_headers: false,
    },
    ProviderSpec {
        name: "openrouter",
        display_name: "OpenRouter",
        env_key: "OPENROUTER_API_KEY",
        default_api_base: "https://openrouter.ai/api/v1",
        attribution_headers: true,
    },
    ProviderSpec {
        name: "deepseek",
        display_name: "DeepSeek",
        env_key: "DEEPSEEK_API_KEY",
        default_api_base: "https://api.deepseek.com/v1",
        attribution_headers: false,
    },
    ProviderSpec {
        name: "groq",
        display_name: "Groq",
        env_key: "GROQ_API_KEY",
        default_api_base: "https://api.groq.com/openai/v1",
        attribution_headers: false,
    },
];

// ─────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Select the configured provider by name.
///
/// Fails with `NotConfigured` when the name is unknown or the provider has
/// no API key.
pub fn select_provider<'a>(
    name: &str,
    providers: &'a HashMap<String, ProviderConfig>,
) -> Result<(&'a ProviderConfig, &'static ProviderSpec), ProviderError> {
    let spec = find_by_name(name).ok_or_else(|| ProviderError::NotConfigured(name.to_string()))?;
    let config = providers
        .get(spec.name)
        .filter(|c| c.is_configured())
        .ok_or_else(|| ProviderError::NotConfigured(name.to_string()))?;
    Ok((config, spec))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
