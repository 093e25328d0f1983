//! Configuration schema.
//!
//! Hierarchy: `Config` → `GatewayConfig`, `LlmConfig`, `ProvidersConfig`,
//! `ToolsConfig`, `MemoryConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.pincer/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub llm: LlmConfig,
    pub providers: ProvidersConfig,
    pub tools: ToolsConfig,
    pub memory: MemoryConfig,
}

// ─────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────

/// Network bind settings for the WebSocket server.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 18789,
        }
    }
}

impl GatewayConfig {
    /// The `host:port` bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ─────────────────────────────────────────────
// LLM
// ─────────────────────────────────────────────

/// Settings for the `llm-call` dispatch path.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmConfig {
    /// Provider name (`"anthropic"`, `"openai"`, `"openrouter"`, …).
    pub provider: String,
    /// Model identifier passed to the provider.
    pub model: String,
    /// Maximum tokens to generate per response.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Optional `HTTP-Referer` header (OpenRouter attribution).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    /// Optional `X-Title` header (OpenRouter attribution).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openrouter".to_string(),
            model: "anthropic/claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            referer: None,
            title: None,
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single LLM provider (API key, base URL, headers).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// All provider configurations, one per supported backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub anthropic: ProviderConfig,
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub openrouter: ProviderConfig,
    #[serde(default)]
    pub deepseek: ProviderConfig,
    #[serde(default)]
    pub groq: ProviderConfig,
}

impl ProvidersConfig {
    /// Provider configs keyed by name, for registry lookup.
    pub fn to_map(&self) -> HashMap<String, ProviderConfig> {
        let mut map = HashMap::new();
        map.insert("anthropic".to_string(), self.anthropic.clone());
        map.insert("openai".to_string(), self.openai.clone());
        map.insert("openrouter".to_string(), self.openrouter.clone());
        map.insert("deepseek".to_string(), self.deepseek.clone());
        map.insert("groq".to_string(), self.groq.clone());
        map
    }
}

// ─────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────

/// Settings for the built-in tools.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolsConfig {
    pub exec: ExecConfig,
    pub fetch: FetchConfig,
}

/// Subprocess execution settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecConfig {
    /// Wall-clock timeout in seconds before the child is killed.
    pub timeout: u64,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self { timeout: 30 }
    }
}

/// HTTP fetch settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Maximum response body length kept (characters).
    pub max_body_len: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 20,
            max_body_len: 100_000,
        }
    }
}

// ─────────────────────────────────────────────
// Memory
// ─────────────────────────────────────────────

/// Journal location.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryConfig {
    /// Journal file path. Empty means `<data dir>/memory/MEMORY.md`.
    #[serde(default)]
    pub path: String,
}

impl MemoryConfig {
    /// Resolve the journal path, falling back to the default location.
    pub fn resolved_path(&self) -> std::path::PathBuf {
        if self.path.is_empty() {
            crate::utils::get_data_path().join("memory").join("MEMORY.md")
        } else {
            crate::utils::expand_home(&self.path)
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
