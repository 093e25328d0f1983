//! `pincer onboard` — initialize configuration and data directory.

use anyhow::Result;
use colored::Colorize;

use pincer_core::config::{load_config, save_config};
use pincer_core::utils::get_data_path;
use pincer_core::MemoryJournal;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "🦞 Pincer — Setup".cyan().bold());
    println!();

    let data_dir = get_data_path();
    let config_path = data_dir.join("config.json");

    // 1. Create config if it doesn't exist
    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        let config = load_config(None); // defaults + env
        save_config(&config, Some(&config_path))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    // 2. Bootstrap the memory journal
    let config = load_config(None);
    let journal_path = config.memory.resolved_path();
    MemoryJournal::open(&journal_path)?;
    println!("  {} journal at {}", "✓".green(), journal_path.display());

    // 3. History directory for the client REPL
    let history_dir = data_dir.join("history");
    std::fs::create_dir_all(&history_dir)?;
    println!("  {} history dir at {}", "✓".green(), history_dir.display());

    println!();
    println!(
        "{}",
        "  Setup complete! Run `pincer gateway` to start the server.".green()
    );
    println!(
        "{}",
        "  Set an API key (e.g. OPENROUTER_API_KEY) to enable llm-call tasks.".dimmed()
    );
    println!();

    Ok(())
}
