//! `pincer status` — show configuration and provider status.

use anyhow::Result;
use colored::Colorize;

use pincer_core::config::load_config;
use pincer_core::utils::get_data_path;
use pincer_providers::registry::PROVIDERS;

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let data_dir = get_data_path();
    let config_path = data_dir.join("config.json");

    println!();
    println!("{}", "🦞 Pincer Status".cyan().bold());
    println!();

    // Config
    let config_exists = config_path.exists();
    println!(
        "  {:<12} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Gateway bind address
    println!(
        "  {:<12} ws://{}",
        "Gateway:".bold(),
        config.gateway.bind_addr()
    );

    // Memory journal
    let journal_path = config.memory.resolved_path();
    let journal_exists = journal_path.exists();
    println!(
        "  {:<12} {} {}",
        "Memory:".bold(),
        journal_path.display(),
        if journal_exists {
            "✓".green().to_string()
        } else {
            "(not created yet)".dimmed().to_string()
        }
    );

    // LLM selection
    println!(
        "  {:<12} {} | model: {} | temp: {} | max_tokens: {}",
        "LLM:".bold(),
        config.llm.provider,
        config.llm.model.clone().dimmed(),
        format!("{}", config.llm.temperature).dimmed(),
        format!("{}", config.llm.max_tokens).dimmed(),
    );

    // Providers
    println!();
    println!("  {}", "Providers:".bold());
    let providers_map = config.providers.to_map();

    for spec in PROVIDERS {
        let selected = spec.name == config.llm.provider;
        let status = match providers_map.get(spec.name) {
            Some(p) if p.is_configured() => format!("{} (key set)", "✓".green()),
            _ => format!("{}", "· not configured".dimmed()),
        };
        let marker = if selected { "→" } else { " " };
        println!("   {marker} {:<12} {}", spec.display_name, status);
    }

    println!();
    Ok(())
}
