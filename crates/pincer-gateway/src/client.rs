//! Gateway client — outbound connection with an explicit lifecycle.
//!
//! Reconnect-on-failure is modeled as a state machine
//! `{Disconnected, Connecting, Connected, Backoff}` with a bounded retry
//! budget and capped exponential backoff, instead of an unbounded
//! timer-based retry loop.

use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use pincer_core::{ClientFrame, ServerFrame};

// ─────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────

/// Where the client is in its connection lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Backoff,
}

/// Bounded retry policy with capped exponential backoff.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Total connection attempts before giving up.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles each retry.
    pub base_delay: Duration,
    /// Ceiling on the backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

// ─────────────────────────────────────────────
// GatewayClient
// ─────────────────────────────────────────────

/// Connects to a gateway, retrying per policy.
pub struct GatewayClient {
    url: String,
    policy: RetryPolicy,
    state: ConnectionState,
}

impl GatewayClient {
    /// Create a client for `url` (e.g. `"ws://127.0.0.1:18789"`).
    pub fn new(url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            url: url.into(),
            policy,
            state: ConnectionState::Disconnected,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Connect, retrying up to the policy's budget.
    ///
    /// On success the returned session has already consumed the `hello`
    /// handshake and carries the assigned identity.
    pub async fn connect(&mut self) -> anyhow::Result<ClientSession> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            self.state = ConnectionState::Connecting;
            debug!(url = %self.url, attempt, "connecting to gateway");

            match connect_async(self.url.as_str()).await {
                Ok((ws, _)) => {
                    self.state = ConnectionState::Connected;
                    let mut session = ClientSession::new(ws);
                    session.handshake().await?;
                    info!(
                        url = %self.url,
                        client_id = session.client_id().unwrap_or("?"),
                        "connected to gateway"
                    );
                    return Ok(session);
                }
                Err(e) => {
                    if attempt >= self.policy.max_attempts {
                        self.state = ConnectionState::Disconnected;
                        return Err(e).with_context(|| {
                            format!("giving up after {attempt} attempts to reach {}", self.url)
                        });
                    }
                    self.state = ConnectionState::Backoff;
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        url = %self.url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "connect failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

// ─────────────────────────────────────────────
// ClientSession
// ─────────────────────────────────────────────

/// An established connection speaking the wire protocol.
pub struct ClientSession {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    client_id: Option<String>,
}

impl std::fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl ClientSession {
    fn new(ws: WebSocketStream<MaybeTlsStream<TcpStream>>) -> Self {
        Self {
            ws,
            client_id: None,
        }
    }

    /// The identity assigned by the gateway's `hello` frame.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Consume the `hello` handshake frame.
    async fn handshake(&mut self) -> anyhow::Result<()> {
        match self.recv().await? {
            Some(ServerFrame::Hello { client_id, .. }) => {
                self.client_id = Some(client_id);
                Ok(())
            }
            Some(other) => anyhow::bail!("expected hello frame, got {other:?}"),
            None => anyhow::bail!("connection closed before handshake"),
        }
    }

    /// Send one frame.
    pub async fn send(&mut self, frame: &ClientFrame) -> anyhow::Result<()> {
        let text = serde_json::to_string(frame)?;
        self.ws.send(WsMessage::text(text)).await?;
        Ok(())
    }

    /// Receive the next protocol frame, skipping non-text messages.
    /// Returns `None` when the connection closes.
    pub async fn recv(&mut self) -> anyhow::Result<Option<ServerFrame>> {
        while let Some(msg) = self.ws.next().await {
            match msg? {
                WsMessage::Text(text) => {
                    let frame: ServerFrame = serde_json::from_str(text.as_ref())
                        .context("unparseable frame from gateway")?;
                    return Ok(Some(frame));
                }
                WsMessage::Close(_) => return Ok(None),
                _ => continue,
            }
        }
        Ok(None)
    }

    /// Send a frame and wait for its reply.
    pub async fn request(&mut self, frame: &ClientFrame) -> anyhow::Result<ServerFrame> {
        self.send(frame).await?;
        self.recv()
            .await?
            .ok_or_else(|| anyhow::anyhow!("connection closed while awaiting reply"))
    }

    /// Close the connection gracefully.
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.ws.send(WsMessage::Close(None)).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::GatewayServer;
    use pincer_agent::Dispatcher;
    use pincer_core::config::Config;
    use pincer_core::{MemoryJournal, Task};
    use serde_json::json;
    use std::sync::Arc;

    /// Spin up a gateway on an ephemeral port; returns its ws:// URL.
    async fn spawn_gateway() -> (tempfile::TempDir, Arc<GatewayServer>, String) {
        let dir = tempfile::tempdir().unwrap();
        let journal =
            Arc::new(MemoryJournal::open(dir.path().join("MEMORY.md")).unwrap());
        let dispatcher = Arc::new(Dispatcher::with_defaults(
            &Config::default(),
            journal.clone(),
            None,
        ));
        let server = Arc::new(GatewayServer::new(dispatcher, journal));

        let listener = GatewayServer::listen("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(server.clone().run(listener));

        (dir, server, format!("ws://{addr}"))
    }

    // ── RetryPolicy ──

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(4), Duration::from_millis(500)); // capped
        assert_eq!(policy.delay_for(9), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn bounded_retry_gives_up() {
        let policy = RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(20),
        };
        let mut client = GatewayClient::new("ws://127.0.0.1:1", policy);

        let err = client.connect().await.unwrap_err();
        assert!(err.to_string().contains("2 attempts"));
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn initial_state_is_disconnected() {
        let client = GatewayClient::new("ws://nowhere", RetryPolicy::default());
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    // ── Live round-trips ──

    #[tokio::test]
    async fn handshake_assigns_identity() {
        let (_dir, server, url) = spawn_gateway().await;

        let mut client = GatewayClient::new(url, RetryPolicy::default());
        let session = client.connect().await.unwrap();

        assert_eq!(client.state(), ConnectionState::Connected);
        let id = session.client_id().unwrap();
        assert!(!id.is_empty());

        // The server registered exactly this connection.
        assert!(server.registry().contains(id).await);
        assert_eq!(server.registry().len().await, 1);
    }

    #[tokio::test]
    async fn ping_pong_round_trip() {
        let (_dir, _server, url) = spawn_gateway().await;
        let mut client = GatewayClient::new(url, RetryPolicy::default());
        let mut session = client.connect().await.unwrap();

        let reply = session.request(&ClientFrame::Ping).await.unwrap();
        match reply {
            ServerFrame::Pong { time } => assert!(time > 0),
            other => panic!("expected pong, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn hash_tool_round_trip() {
        let (_dir, _server, url) = spawn_gateway().await;
        let mut client = GatewayClient::new(url, RetryPolicy::default());
        let mut session = client.connect().await.unwrap();

        let frame = ClientFrame::Agent {
            payload: pincer_core::AgentPayload {
                task: Task::ToolCall {
                    name: "hash".into(),
                    args: vec![json!("abc"), json!("sha256")],
                },
                context: None,
            },
        };
        let reply = session.request(&frame).await.unwrap();
        match reply {
            ServerFrame::AgentResponse { result } => {
                assert!(result.success);
                assert_eq!(
                    result.field("hash").unwrap().as_str().unwrap(),
                    "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
                );
            }
            other => panic!("expected agent-response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn memory_round_trip_over_wire() {
        let (_dir, _server, url) = spawn_gateway().await;
        let mut client = GatewayClient::new(url, RetryPolicy::default());
        let mut session = client.connect().await.unwrap();

        let append = ClientFrame::Memory {
            operation: pincer_core::MemoryOperation::Append,
            data: Some("note1".into()),
        };
        let reply = session.request(&append).await.unwrap();
        assert_eq!(
            reply,
            ServerFrame::MemoryResponse {
                memory: "OK".into()
            }
        );

        let read = ClientFrame::Memory {
            operation: pincer_core::MemoryOperation::Read,
            data: None,
        };
        let reply = session.request(&read).await.unwrap();
        match reply {
            ServerFrame::MemoryResponse { memory } => assert!(memory.contains("note1")),
            other => panic!("expected memory-response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn disconnect_shrinks_registry() {
        let (_dir, server, url) = spawn_gateway().await;

        let mut client = GatewayClient::new(url.clone(), RetryPolicy::default());
        let session = client.connect().await.unwrap();
        let id = session.client_id().unwrap().to_string();
        assert_eq!(server.registry().len().await, 1);

        session.close().await.unwrap();

        // Removal happens when the server's read loop observes the close.
        for _ in 0..50 {
            if !server.registry().contains(&id).await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!server.registry().contains(&id).await);
        assert_eq!(server.registry().len().await, 0);
    }

    #[tokio::test]
    async fn two_connections_get_distinct_identities() {
        let (_dir, server, url) = spawn_gateway().await;

        let mut c1 = GatewayClient::new(url.clone(), RetryPolicy::default());
        let mut c2 = GatewayClient::new(url, RetryPolicy::default());
        let s1 = c1.connect().await.unwrap();
        let s2 = c2.connect().await.unwrap();

        assert_ne!(s1.client_id(), s2.client_id());
        assert_eq!(server.registry().len().await, 2);
    }
}
