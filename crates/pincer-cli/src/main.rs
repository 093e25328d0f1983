//! Pincer CLI — entry point.
//!
//! # Commands
//!
//! - `pincer gateway` — run the WebSocket gateway server
//! - `pincer client` — interactive client REPL against a running gateway
//! - `pincer send <frame>` — one-shot: send a raw JSON frame, print the reply
//! - `pincer onboard` — initialize config + data directory
//! - `pincer status` — show configuration and provider status

mod client_cmd;
mod gateway;
mod helpers;
mod onboard;
mod send;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// 🦞 Pincer — WebSocket gateway with an agent/tool dispatch core
#[derive(Parser)]
#[command(name = "pincer", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server
    Gateway {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Interactive client REPL against a running gateway
    Client {
        /// Gateway URL (defaults to the configured bind address)
        #[arg(short, long)]
        url: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Send one raw JSON frame and print the reply
    Send {
        /// The frame, e.g. '{"type":"ping"}'
        frame: String,

        /// Gateway URL (defaults to the configured bind address)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Initialize configuration and data directory
    Onboard,

    /// Show configuration and provider status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Gateway { logs } => {
            init_logging(logs);
            gateway::run().await
        }
        Commands::Client { url, logs } => {
            init_logging(logs);
            client_cmd::run(url).await
        }
        Commands::Send { frame, url } => {
            init_logging(false);
            send::run(&frame, url).await
        }
        Commands::Onboard => onboard::run(),
        Commands::Status => status::run(),
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("pincer=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
