//! Gateway command — wire up the journal, dispatcher, and server, then run.
//!
//! Startup sequence:
//! 1. Load config
//! 2. Open the memory journal
//! 3. Create the LLM provider (optional — `llm-call` degrades gracefully)
//! 4. Build the dispatcher with the default tool/skill set
//! 5. Bind and run, with Ctrl+C for shutdown

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};

use pincer_agent::Dispatcher;
use pincer_core::config::load_config;
use pincer_core::MemoryJournal;
use pincer_gateway::GatewayServer;
use pincer_providers::{create_provider, LlmProvider};

use crate::helpers;

/// Run the gateway server.
pub async fn run() -> Result<()> {
    helpers::print_banner();
    println!("  Mode: Gateway");
    println!();

    // 1. Load config
    let config = load_config(None);

    // 2. Open the shared journal
    let journal_path = config.memory.resolved_path();
    let journal = Arc::new(
        MemoryJournal::open(&journal_path)
            .with_context(|| format!("failed to open journal at {}", journal_path.display()))?,
    );

    // 3. Provider is optional: without one, llm-call tasks return failure
    //    envelopes but tools and skills keep working.
    let provider: Option<Arc<dyn LlmProvider>> = match create_provider(&config) {
        Ok(p) => {
            println!("  LLM:       {} ({})", p.display_name(), p.model());
            Some(Arc::new(p))
        }
        Err(e) => {
            warn!(error = %e, "LLM provider unavailable");
            println!("  LLM:       {} ({e})", "disabled".dimmed());
            None
        }
    };

    // 4. Dispatcher with the default tool/skill set
    let dispatcher = Arc::new(Dispatcher::with_defaults(&config, journal.clone(), provider));
    println!("  Tools:     {}", dispatcher.tools().tool_names().join(", "));
    println!("  Skills:    {}", dispatcher.skills().skill_names().join(", "));
    println!("  Memory:    {}", journal_path.display());

    // 5. Bind and run
    let server = Arc::new(GatewayServer::new(dispatcher, journal));
    let addr = config.gateway.bind_addr();
    let listener = GatewayServer::listen(&addr).await?;

    println!("  Listening: ws://{addr}");
    println!();
    println!("  Ctrl+C to stop");
    println!();

    info!(addr = %addr, "gateway starting");

    tokio::select! {
        result = server.run(listener) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "gateway error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("  Shutting down...");
            info!("received Ctrl+C, shutting down");
        }
    }

    println!("  Gateway stopped. Goodbye!");
    Ok(())
}
