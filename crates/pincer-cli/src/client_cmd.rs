//! Interactive client REPL — speaks the wire protocol to a running gateway.
//!
//! Uses `rustyline` for readline-style editing with persistent history.
//!
//! # Commands
//!
//! - `ping`
//! - `memory read` / `memory append <text>`
//! - `tool <name> [args…]` — args as words, or one JSON array
//! - `skill <name> [args…]`
//! - `llm <prompt>`
//! - `help`, `exit`

use anyhow::Result;
use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use serde_json::Value;
use tracing::debug;

use pincer_core::config::load_config;
use pincer_core::{AgentPayload, ClientFrame, MemoryOperation, Task};
use pincer_gateway::{GatewayClient, RetryPolicy};

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// Run the interactive client.
pub async fn run(url: Option<String>) -> Result<()> {
    let config = load_config(None);
    let url = url.unwrap_or_else(|| helpers::gateway_url(&config));

    helpers::print_banner();
    println!("  Connecting to {url} ...");

    let mut client = GatewayClient::new(url, RetryPolicy::default());
    let mut session = client.connect().await?;
    if let Some(id) = session.client_id() {
        println!("  {} {}", "connected as".dimmed(), id.cyan());
    }
    println!("  Type \"help\" for commands, \"exit\" to quit.");
    println!();

    let mut editor = create_editor()?;

    loop {
        let input = match editor.readline("pincer> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_exit_command(trimmed) {
            break;
        }
        if trimmed.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }

        let _ = editor.add_history_entry(&input);

        let frame = match parse_command(trimmed) {
            Ok(frame) => frame,
            Err(e) => {
                eprintln!("{} {e}", "error:".red().bold());
                continue;
            }
        };

        debug!(input = trimmed, "sending frame");
        match session.request(&frame).await {
            Ok(reply) => helpers::print_frame(&reply),
            Err(e) => {
                eprintln!("{} {e}", "error:".red().bold());
                break;
            }
        }
    }

    save_history(&mut editor);
    let _ = session.close().await;
    println!("\nGoodbye! 👋");
    Ok(())
}

/// Parse a REPL line into a protocol frame.
fn parse_command(input: &str) -> Result<ClientFrame, String> {
    let mut parts = input.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or("").trim();

    match command {
        "ping" => Ok(ClientFrame::Ping),

        "memory" => {
            let mut sub = rest.splitn(2, char::is_whitespace);
            match (sub.next().unwrap_or_default(), sub.next()) {
                ("read", _) => Ok(ClientFrame::Memory {
                    operation: MemoryOperation::Read,
                    data: None,
                }),
                ("append", Some(text)) if !text.trim().is_empty() => Ok(ClientFrame::Memory {
                    operation: MemoryOperation::Append,
                    data: Some(text.trim().to_string()),
                }),
                ("append", _) => Err("usage: memory append <text>".into()),
                _ => Err("usage: memory read | memory append <text>".into()),
            }
        }

        "tool" => {
            let (name, args) = parse_name_and_args(rest)?;
            Ok(agent_frame(Task::ToolCall { name, args }))
        }

        "skill" => {
            let (name, args) = parse_name_and_args(rest)?;
            Ok(agent_frame(Task::SkillCall { name, args }))
        }

        "llm" => {
            if rest.is_empty() {
                return Err("usage: llm <prompt>".into());
            }
            Ok(agent_frame(Task::LlmCall {
                prompt: rest.to_string(),
                context: None,
            }))
        }

        other => Err(format!("unknown command: {other} (try \"help\")")),
    }
}

/// Split `<name> [args…]`; args are either one JSON array or bare words.
fn parse_name_and_args(rest: &str) -> Result<(String, Vec<Value>), String> {
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_string();
    if name.is_empty() {
        return Err("missing name".into());
    }

    let raw_args = parts.next().unwrap_or("").trim();
    let args = if raw_args.is_empty() {
        Vec::new()
    } else if raw_args.starts_with('[') {
        serde_json::from_str::<Vec<Value>>(raw_args)
            .map_err(|e| format!("invalid JSON args: {e}"))?
    } else {
        raw_args
            .split_whitespace()
            .map(|word| Value::String(word.to_string()))
            .collect()
    };

    Ok((name, args))
}

fn agent_frame(task: Task) -> ClientFrame {
    ClientFrame::Agent {
        payload: AgentPayload {
            task,
            context: None,
        },
    }
}

fn print_help() {
    println!("  ping                       liveness probe");
    println!("  memory read                print the journal");
    println!("  memory append <text>       append a timestamped entry");
    println!("  tool <name> [args…]        e.g. tool hash abc sha256");
    println!("  skill <name> [args…]       e.g. skill memory last 3");
    println!("  llm <prompt>               ask the configured model");
    println!("  exit                       quit");
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Path to the history file.
fn history_path() -> std::path::PathBuf {
    pincer_core::utils::get_data_path()
        .join("history")
        .join("cli_history")
}

/// Check if input is an exit command.
fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
