//! Config loader — reads `~/.pincer/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.pincer/config.json`
//! 3. Environment variables `PINCER_<SECTION>__<FIELD>` (override JSON)
//! 4. Bare provider keys (`ANTHROPIC_API_KEY`, …) as a convenience fallback

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be
/// parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `PINCER_<SECTION>__<FIELD>` (double underscore as
/// delimiter).
///
/// Supported overrides:
/// - `PINCER_GATEWAY__HOST` → `gateway.host`
/// - `PINCER_GATEWAY__PORT` → `gateway.port`
/// - `PINCER_LLM__PROVIDER` → `llm.provider`
/// - `PINCER_LLM__MODEL` → `llm.model`
/// - `PINCER_LLM__MAX_TOKENS` / `PINCER_LLM__TEMPERATURE`
/// - `PINCER_LLM__REFERER` / `PINCER_LLM__TITLE`
/// - `PINCER_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `PINCER_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `<NAME>_API_KEY` (e.g. `OPENROUTER_API_KEY`) as a fallback key source
/// - `PINCER_TOOLS__EXEC__TIMEOUT` / `PINCER_TOOLS__FETCH__TIMEOUT`
/// - `PINCER_MEMORY__PATH`
fn apply_env_overrides(mut config: Config) -> Config {
    // Gateway
    if let Ok(val) = std::env::var("PINCER_GATEWAY__HOST") {
        config.gateway.host = val;
    }
    if let Ok(val) = std::env::var("PINCER_GATEWAY__PORT") {
        if let Ok(p) = val.parse::<u16>() {
            config.gateway.port = p;
        }
    }

    // LLM
    if let Ok(val) = std::env::var("PINCER_LLM__PROVIDER") {
        config.llm.provider = val;
    }
    if let Ok(val) = std::env::var("PINCER_LLM__MODEL") {
        config.llm.model = val;
    }
    if let Ok(val) = std::env::var("PINCER_LLM__MAX_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.llm.max_tokens = n;
        }
    }
    if let Ok(val) = std::env::var("PINCER_LLM__TEMPERATURE") {
        if let Ok(t) = val.parse::<f64>() {
            config.llm.temperature = t;
        }
    }
    if let Ok(val) = std::env::var("PINCER_LLM__REFERER") {
        config.llm.referer = Some(val);
    }
    if let Ok(val) = std::env::var("PINCER_LLM__TITLE") {
        config.llm.title = Some(val);
    }

    // Provider API keys (by provider name)
    apply_provider_env(&mut config.providers.anthropic, "ANTHROPIC");
    apply_provider_env(&mut config.providers.openai, "OPENAI");
    apply_provider_env(&mut config.providers.openrouter, "OPENROUTER");
    apply_provider_env(&mut config.providers.deepseek, "DEEPSEEK");
    apply_provider_env(&mut config.providers.groq, "GROQ");

    // Tools
    if let Ok(val) = std::env::var("PINCER_TOOLS__EXEC__TIMEOUT") {
        if let Ok(n) = val.parse::<u64>() {
            config.tools.exec.timeout = n;
        }
    }
    if let Ok(val) = std::env::var("PINCER_TOOLS__FETCH__TIMEOUT") {
        if let Ok(n) = val.parse::<u64>() {
            config.tools.fetch.timeout = n;
        }
    }

    // Memory
    if let Ok(val) = std::env::var("PINCER_MEMORY__PATH") {
        config.memory.path = val;
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(provider: &mut ProviderConfig, name: &str) {
    if let Ok(val) = std::env::var(format!("PINCER_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    } else if provider.api_key.is_empty() {
        if let Ok(val) = std::env::var(format!("{name}_API_KEY")) {
            provider.api_key = val;
        }
    }
    if let Ok(val) = std::env::var(format!("PINCER_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
