//! Gateway server — accept loop, per-connection tasks, and frame routing.
//!
//! Every inbound message yields exactly one reply frame to its sender:
//! parse failures and routing errors become `{"type":"error"}` replies,
//! never a dropped session. Unrecognized `type` values get a structured
//! "unsupported message type" error instead of silence.

use std::sync::Arc;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pincer_agent::Dispatcher;
use pincer_core::{
    utils, ClientFrame, Envelope, MemoryJournal, MemoryOperation, ServerFrame, Task,
};

use crate::registry::ConnectionRegistry;

/// Outbound frame queue depth per connection.
const OUTBOUND_BUFFER: usize = 32;

/// The gateway: connection registry + dispatcher + shared journal.
pub struct GatewayServer {
    registry: Arc<ConnectionRegistry>,
    dispatcher: Arc<Dispatcher>,
    journal: Arc<MemoryJournal>,
}

impl GatewayServer {
    /// Create a gateway over a dispatcher and journal.
    pub fn new(dispatcher: Arc<Dispatcher>, journal: Arc<MemoryJournal>) -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            dispatcher,
            journal,
        }
    }

    /// The connection registry.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Bind a TCP listener on `addr`.
    pub async fn listen(addr: &str) -> anyhow::Result<TcpListener> {
        TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))
    }

    /// Accept connections forever, one spawned task per connection.
    pub async fn run(self: Arc<Self>, listener: TcpListener) -> anyhow::Result<()> {
        let local = listener.local_addr()?;
        info!(addr = %local, "gateway listening");

        loop {
            let (stream, peer) = listener.accept().await?;
            let server = self.clone();
            tokio::spawn(async move {
                server.handle_socket(stream, peer.to_string()).await;
            });
        }
    }

    /// Drive one client connection from handshake to close.
    async fn handle_socket(self: Arc<Self>, stream: TcpStream, peer: String) {
        let ws = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                warn!(%peer, error = %e, "websocket handshake failed");
                return;
            }
        };

        let (mut write, mut read) = ws.split();
        let client_id = Uuid::new_v4().to_string();
        let (tx, mut rx) = mpsc::channel::<ServerFrame>(OUTBOUND_BUFFER);

        self.registry.register(&client_id, tx.clone()).await;
        info!(client = %client_id, %peer, "client connected");

        // Writer task — drains the outbound queue onto the socket.
        let writer = tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                let Ok(text) = serde_json::to_string(&frame) else {
                    continue;
                };
                if write.send(WsMessage::text(text)).await.is_err() {
                    break;
                }
            }
        });

        // Handshake reply with the assigned identity.
        let hello = ServerFrame::Hello {
            client_id: client_id.clone(),
            timestamp: utils::timestamp(),
        };
        let _ = tx.send(hello).await;

        // Read loop — each message is handled to completion (awaits
        // included) before the next one, so replies keep arrival order.
        while let Some(msg) = read.next().await {
            match msg {
                Ok(WsMessage::Text(text)) => {
                    let reply = self.handle_frame(&client_id, text.as_ref()).await;
                    if tx.send(reply).await.is_err() {
                        break;
                    }
                }
                Ok(WsMessage::Close(_)) => {
                    debug!(client = %client_id, "close frame received");
                    break;
                }
                Ok(_) => {} // binary / ping / pong — nothing to route
                Err(e) => {
                    warn!(client = %client_id, error = %e, "websocket read error");
                    break;
                }
            }
        }

        // Registry entry and queue go away together; the writer drains
        // whatever was already queued, then exits.
        self.registry.remove(&client_id).await;
        drop(tx);
        let _ = writer.await;
        info!(client = %client_id, "client disconnected");
    }

    /// Parse and route one raw inbound message, producing exactly one reply.
    pub async fn handle_frame(&self, client_id: &str, raw: &str) -> ServerFrame {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(client = %client_id, error = %e, "malformed message");
                return ServerFrame::error(format!("parse error: {e}"));
            }
        };

        let msg_type = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match serde_json::from_value::<ClientFrame>(value) {
            Ok(frame) => {
                debug!(client = %client_id, r#type = %msg_type, "routing message");
                self.route(frame).await
            }
            Err(e) => match msg_type.as_str() {
                "" => ServerFrame::error("parse error: missing message type"),
                "ping" | "agent" | "memory" => {
                    warn!(client = %client_id, error = %e, "invalid message body");
                    ServerFrame::error(format!("parse error: {e}"))
                }
                other => ServerFrame::error(format!("unsupported message type: {other}")),
            },
        }
    }

    /// Route a parsed frame to its handler.
    async fn route(&self, frame: ClientFrame) -> ServerFrame {
        match frame {
            ClientFrame::Ping => ServerFrame::Pong {
                time: utils::unix_millis(),
            },

            ClientFrame::Agent { payload } => {
                let task = merge_context(payload.task, payload.context);
                match self.dispatcher.dispatch(&task).await {
                    Ok(result) => ServerFrame::AgentResponse { result },
                    Err(e) => ServerFrame::error(e.to_string()),
                }
            }

            ClientFrame::Memory { operation, data } => match operation {
                MemoryOperation::Read => match self.journal.read().await {
                    Ok(memory) => ServerFrame::MemoryResponse { memory },
                    Err(e) => ServerFrame::error(format!("memory read failed: {e}")),
                },
                MemoryOperation::Append => {
                    let Some(data) = data else {
                        return ServerFrame::error("memory append requires data");
                    };
                    match self.journal.append(&data).await {
                        Ok(()) => ServerFrame::MemoryResponse {
                            memory: "OK".to_string(),
                        },
                        Err(e) => ServerFrame::error(format!("memory append failed: {e}")),
                    }
                }
            },
        }
    }

    /// Broadcast an envelope to every live connection.
    pub async fn broadcast_result(&self, result: Envelope) -> usize {
        self.registry
            .broadcast(ServerFrame::AgentResponse { result })
            .await
    }
}

/// Carry a frame-level `context` into an `llm-call` that has none of its own.
fn merge_context(task: Task, context: Option<Value>) -> Task {
    match (task, context) {
        (
            Task::LlmCall {
                prompt,
                context: None,
            },
            Some(ctx),
        ) => Task::LlmCall {
            prompt,
            context: Some(ctx),
        },
        (task, _) => task,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
