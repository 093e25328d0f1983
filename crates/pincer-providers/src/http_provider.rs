//! Generic HTTP-based LLM provider for OpenAI-compatible APIs.
//!
//! One implementation covers every supported backend — they all speak the
//! `/chat/completions` dialect. The provider is selected by name from the
//! loaded configuration and carries a bounded request timeout.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use pincer_core::config::schema::{Config, LlmConfig, ProviderConfig};

use crate::error::ProviderError;
use crate::registry::{select_provider, ProviderSpec};
use crate::traits::LlmProvider;

/// Wall-clock limit on a single completion round-trip.
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ─────────────────────────────────────────────
// Request / response shapes (provider-internal)
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// A generic LLM provider that talks to any OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled, bounded timeout).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://openrouter.ai/api/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Model for this provider instance.
    model: String,
    /// Generation limits from config.
    max_tokens: u32,
    temperature: f64,
    /// Extra headers sent with each request (attribution, custom).
    extra_headers: HeaderMap,
    /// Static spec for this backend.
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl HttpProvider {
    /// Create a new HttpProvider from a provider config and spec.
    pub fn new(config: &ProviderConfig, spec: &'static ProviderSpec, llm: &LlmConfig) -> Self {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| spec.default_api_base.to_string());

        let mut extra_headers = HeaderMap::new();

        // Attribution headers (OpenRouter rankings)
        if spec.attribution_headers {
            if let Some(referer) = llm.referer.as_deref() {
                if let Ok(val) = HeaderValue::from_str(referer) {
                    extra_headers.insert("http-referer", val);
                }
            }
            if let Some(title) = llm.title.as_deref() {
                if let Ok(val) = HeaderValue::from_str(title) {
                    extra_headers.insert("x-title", val);
                }
            }
        }

        // User-supplied headers
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!("Invalid header: {}={}", key, value);
                }
            }
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        HttpProvider {
            client,
            api_base,
            api_key: config.api_key.clone(),
            model: llm.model.clone(),
            max_tokens: llm.max_tokens,
            temperature: llm.temperature,
            extra_headers,
            spec,
        }
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    /// Build the message list: optional context as a system message, then
    /// the user prompt.
    fn build_messages(prompt: &str, context: Option<&Value>) -> Vec<ChatMessage> {
        let mut messages = Vec::new();
        if let Some(ctx) = context {
            messages.push(ChatMessage {
                role: "system",
                content: format!("Context:\n{}", ctx),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt.to_string(),
        });
        messages
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn generate(
        &self,
        prompt: &str,
        context: Option<&Value>,
    ) -> Result<String, ProviderError> {
        debug!(
            provider = self.spec.display_name,
            model = %self.model,
            prompt_len = prompt.len(),
            has_context = context.is_some(),
            "Calling LLM"
        );

        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: Self::build_messages(prompt, context),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .headers(self.extra_headers.clone())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.spec.display_name, error = %e, "HTTP request failed");
                ProviderError::Request {
                    provider: self.spec.display_name,
                    source: e,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            error!(
                provider = self.spec.display_name,
                status = %status,
                body = %body,
                "API error"
            );
            return Err(ProviderError::Api {
                provider: self.spec.display_name,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| ProviderError::Malformed {
                provider: self.spec.display_name,
                detail: e.to_string(),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::Malformed {
                provider: self.spec.display_name,
                detail: "no content in first choice".to_string(),
            })?;

        debug!(
            provider = self.spec.display_name,
            content_len = content.len(),
            "LLM response received"
        );
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Builder (convenience)
// ─────────────────────────────────────────────

/// Build an HttpProvider from the loaded configuration.
///
/// Selects the backend named by `llm.provider` and fails with
/// `NotConfigured` if it has no API key.
pub fn create_provider(config: &Config) -> Result<HttpProvider, ProviderError> {
    let providers_map = config.providers.to_map();
    let (provider_config, spec) = select_provider(&config.llm.provider, &providers_map)?;

    debug!(
        provider = spec.display_name,
        model = %config.llm.model,
        api_base = provider_config.api_base.as_deref().unwrap_or(spec.default_api_base),
        "Creating LLM provider"
    );

    Ok(HttpProvider::new(provider_config, spec, &config.llm))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_name;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(api_key: &str, api_base: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.to_string(),
            api_base: api_base.map(String::from),
            extra_headers: None,
        }
    }

    fn llm_config(model: &str) -> LlmConfig {
        LlmConfig {
            model: model.to_string(),
            ..Default::default()
        }
    }

    // ── Unit tests ──

    #[test]
    fn completions_url_trailing_slash() {
        let spec = find_by_name("openai").unwrap();
        let config = make_config("key", Some("https://api.openai.com/v1/"));
        let provider = HttpProvider::new(&config, spec, &llm_config("gpt-4o"));
        assert_eq!(
            provider.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn default_api_base_when_unset() {
        let spec = find_by_name("openrouter").unwrap();
        let config = make_config("sk-or-abc", None);
        let provider = HttpProvider::new(&config, spec, &llm_config("meta-llama/llama-3"));
        assert_eq!(provider.api_base, "https://openrouter.ai/api/v1");
    }

    #[test]
    fn config_overrides_default_base() {
        let spec = find_by_name("openrouter").unwrap();
        let config = make_config("sk-or-abc", Some("https://custom.proxy.com/v1"));
        let provider = HttpProvider::new(&config, spec, &llm_config("meta-llama/llama-3"));
        assert_eq!(provider.api_base, "https://custom.proxy.com/v1");
    }

    #[test]
    fn attribution_headers_for_openrouter() {
        let spec = find_by_name("openrouter").unwrap();
        let config = make_config("sk-or-abc", None);
        let mut llm = llm_config("meta-llama/llama-3");
        llm.referer = Some("https://example.com".into());
        llm.title = Some("Pincer".into());
        let provider = HttpProvider::new(&config, spec, &llm);
        assert!(provider.extra_headers.contains_key("http-referer"));
        assert!(provider.extra_headers.contains_key("x-title"));
    }

    #[test]
    fn attribution_headers_skipped_for_direct_backends() {
        let spec = find_by_name("openai").unwrap();
        let config = make_config("key", None);
        let mut llm = llm_config("gpt-4o");
        llm.referer = Some("https://example.com".into());
        let provider = HttpProvider::new(&config, spec, &llm);
        assert!(!provider.extra_headers.contains_key("http-referer"));
    }

    #[test]
    fn build_messages_with_context() {
        let messages =
            HttpProvider::build_messages("hello", Some(&serde_json::json!({"user": "cli"})));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("cli"));
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "hello");
    }

    #[test]
    fn display_name_from_spec() {
        let spec = find_by_name("groq").unwrap();
        let config = make_config("key", None);
        let provider = HttpProvider::new(&config, spec, &llm_config("llama-3.3-70b"));
        assert_eq!(provider.display_name(), "Groq");
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-test",
                "choices": [{
                    "message": { "content": "Hello! I'm Pincer." },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&mock_server)
            .await;

        let spec = find_by_name("openai").unwrap();
        let config = make_config("test-key-123", Some(&mock_server.uri()));
        let provider = HttpProvider::new(&config, spec, &llm_config("gpt-4o"));

        let content = provider.generate("Hello", None).await.unwrap();
        assert_eq!(content, "Hello! I'm Pincer.");
    }

    #[tokio::test]
    async fn generate_sends_model_and_limits() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "deepseek-chat",
                "max_tokens": 4096
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "ok" } }]
            })))
            .mount(&mock_server)
            .await;

        let spec = find_by_name("deepseek").unwrap();
        let config = make_config("ds-key", Some(&mock_server.uri()));
        let provider = HttpProvider::new(&config, spec, &llm_config("deepseek-chat"));

        // If the body matcher fails, wiremock returns 404 → Api error
        let content = provider.generate("test", None).await.unwrap();
        assert_eq!(content, "ok");
    }

    #[tokio::test]
    async fn generate_api_error_is_typed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Rate limit exceeded" }
            })))
            .mount(&mock_server)
            .await;

        let spec = find_by_name("openai").unwrap();
        let config = make_config("key", Some(&mock_server.uri()));
        let provider = HttpProvider::new(&config, spec, &llm_config("gpt-4o"));

        let err = provider.generate("Hello", None).await.unwrap_err();
        match err {
            ProviderError::Api { status, body, .. } => {
                assert_eq!(status, 429);
                assert!(body.contains("Rate limit"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_network_error_is_typed() {
        // Point to a port that's not listening
        let spec = find_by_name("openai").unwrap();
        let config = make_config("key", Some("http://127.0.0.1:1"));
        let provider = HttpProvider::new(&config, spec, &llm_config("gpt-4o"));

        let err = provider.generate("Hello", None).await.unwrap_err();
        assert!(matches!(err, ProviderError::Request { .. }));
    }

    #[tokio::test]
    async fn generate_empty_choices_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&mock_server)
            .await;

        let spec = find_by_name("openai").unwrap();
        let config = make_config("key", Some(&mock_server.uri()));
        let provider = HttpProvider::new(&config, spec, &llm_config("gpt-4o"));

        let err = provider.generate("Hello", None).await.unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
    }

    // ── create_provider ──

    #[test]
    fn create_provider_success() {
        let mut config = Config::default();
        config.llm.provider = "anthropic".to_string();
        config.llm.model = "claude-sonnet-4-20250514".to_string();
        config.providers.anthropic.api_key = "sk-ant-123".to_string();

        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.display_name(), "Anthropic");
        assert_eq!(provider.model(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn create_provider_unconfigured() {
        let mut config = Config::default();
        config.llm.provider = "anthropic".to_string();

        let err = create_provider(&config).unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
