//! Pincer gateway — the WebSocket server and its outbound client.
//!
//! The server accepts client connections, assigns each a fresh identity,
//! parses inbound JSON frames, and routes them to the ping, agent, and
//! memory handlers. Each connection's messages are handled strictly in
//! order; different connections interleave freely.

pub mod client;
pub mod registry;
pub mod server;

pub use client::{ClientSession, ConnectionState, GatewayClient, RetryPolicy};
pub use registry::ConnectionRegistry;
pub use server::GatewayServer;
