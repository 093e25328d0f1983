//! Shared CLI helpers — frame printing, version banner, URL resolution.

use colored::Colorize;

use pincer_core::config::Config;
use pincer_core::ServerFrame;

/// The ws:// URL for the configured gateway bind address.
pub fn gateway_url(config: &Config) -> String {
    format!("ws://{}", config.gateway.bind_addr())
}

/// Print the banner shown at startup.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🦞 Pincer".cyan().bold(), version.dimmed());
    println!();
}

/// Print a server frame to stdout, lightly formatted by type.
pub fn print_frame(frame: &ServerFrame) {
    match frame {
        ServerFrame::Hello {
            client_id,
            timestamp,
        } => {
            println!(
                "{} {} {}",
                "connected as".dimmed(),
                client_id.cyan(),
                format!("({timestamp})").dimmed()
            );
        }
        ServerFrame::Pong { time } => {
            println!("{} time={time}", "pong".green());
        }
        ServerFrame::AgentResponse { result } => {
            let header = if result.success {
                "✓ success".green().to_string()
            } else {
                "✗ failed".red().to_string()
            };
            println!("{header}");
            match serde_json::to_string_pretty(result) {
                Ok(json) => println!("{json}"),
                Err(_) => println!("{result:?}"),
            }
        }
        ServerFrame::MemoryResponse { memory } => {
            println!("{}", memory);
        }
        ServerFrame::Error { message } => {
            eprintln!("{} {message}", "error:".red().bold());
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
