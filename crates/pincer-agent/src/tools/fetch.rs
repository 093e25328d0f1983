//! Fetch tool — bounded HTTP GET.
//!
//! Network-facing, so the client carries a hard request timeout; a hung
//! remote can never wedge the dispatch path.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::base::{require_str, Tool};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default cap on the returned body (characters).
pub const DEFAULT_MAX_BODY_LEN: usize = 100_000;

/// Fetches a URL and returns status + body.
///
/// Args: `[url]`. Payload: `{status, content_type, body}`.
pub struct FetchTool {
    client: Client,
    max_body_len: usize,
}

impl FetchTool {
    /// Create a new fetch tool with the given timeout and body cap.
    pub fn new(timeout_secs: Option<u64>, max_body_len: Option<usize>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(
                timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))
            .build()
            .unwrap_or_default();
        Self {
            client,
            max_body_len: max_body_len.unwrap_or(DEFAULT_MAX_BODY_LEN),
        }
    }
}

#[async_trait]
impl Tool for FetchTool {
    fn name(&self) -> &str {
        "fetch"
    }

    fn description(&self) -> &str {
        "Fetch a URL over HTTP GET and return the status and body."
    }

    async fn execute(&self, args: &[Value]) -> anyhow::Result<Value> {
        let url = require_str(args, 0, "url")?;

        debug!(url = %url, "fetching");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("fetch failed: {e}"))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let mut body = response
            .text()
            .await
            .map_err(|e| anyhow::anyhow!("failed to read body: {e}"))?;
        if body.len() > self.max_body_len {
            body.truncate(self.max_body_len);
        }

        Ok(json!({
            "status": status,
            "content_type": content_type,
            "body": body,
        }))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("hello web")
                    .insert_header("content-type", "text/plain"),
            )
            .mount(&server)
            .await;

        let tool = FetchTool::new(Some(5), None);
        let payload = tool
            .execute(&[json!(format!("{}/page", server.uri()))])
            .await
            .unwrap();

        assert_eq!(payload["status"], 200);
        assert_eq!(payload["body"], "hello web");
        assert!(payload["content_type"].as_str().unwrap().contains("text/plain"));
    }

    #[tokio::test]
    async fn fetch_non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&server)
            .await;

        let tool = FetchTool::new(Some(5), None);
        let payload = tool
            .execute(&[json!(format!("{}/missing", server.uri()))])
            .await
            .unwrap();

        // A completed exchange is not a tool failure; the caller inspects status.
        assert_eq!(payload["status"], 404);
        assert_eq!(payload["body"], "gone");
    }

    #[tokio::test]
    async fn fetch_unreachable_is_error() {
        let tool = FetchTool::new(Some(1), None);
        let err = tool
            .execute(&[json!("http://127.0.0.1:1/nope")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("fetch failed"));
    }

    #[tokio::test]
    async fn fetch_body_is_capped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/big"))
            .respond_with(ResponseTemplate::new(200).set_body_string("y".repeat(500)))
            .mount(&server)
            .await;

        let tool = FetchTool::new(Some(5), Some(100));
        let payload = tool
            .execute(&[json!(format!("{}/big", server.uri()))])
            .await
            .unwrap();
        assert_eq!(payload["body"].as_str().unwrap().len(), 100);
    }

    #[tokio::test]
    async fn fetch_missing_url_is_error() {
        let tool = FetchTool::new(None, None);
        assert!(tool.execute(&[]).await.is_err());
    }
}
