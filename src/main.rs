//! MyAnimeList -> Notion sync tool
//!
//! Mirrors a MyAnimeList anime list into a Notion database

// animelistsync/src/main.rs
mod config;
mod errors;
mod myanimelist;
mod notion;
mod sync;
mod utils;

use anyhow::{Context, Result};
use config::{AppConfig, Secrets, discover_config_files};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const CONFIG_DIR: &str = "configs";

/// Main entry point for the sync tool
#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the variables may come from the shell.
    dotenv::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run_app().await {
        Ok(summary) if summary.failures.is_empty() => {
            println!(
                "✅ Sync completed: {} fetched, {} created, {} updated.",
                summary.fetched, summary.created, summary.updated
            );
            ExitCode::SUCCESS
        }
        Ok(summary) => {
            println!(
                "⚠️ Sync completed with {} failed writes: {} fetched, {} created, {} updated.",
                summary.failures.len(),
                summary.fetched,
                summary.created,
                summary.updated
            );
            for failure in &summary.failures {
                println!("   - {}: {}", failure.operation, failure.error);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app() -> Result<sync::SyncSummary> {
    let args: Vec<String> = env::args().collect();
    let config_path = if args.len() > 1 {
        PathBuf::from(args[1].trim())
    } else {
        prompt_config_path(Path::new(CONFIG_DIR))?
    };

    let secrets = Secrets::from_env().context("Missing API credentials")?;
    let app_config = AppConfig::load_from_json(&config_path, secrets).context(format!(
        "Failed to load configuration from {}",
        config_path.display()
    ))?;

    println!("⚙️ Starting Sync Process...");
    sync::run_sync_flow(&app_config, prompt_yes_no).await
}

/// Lists the config documents in `dir` and asks which one to use
fn prompt_config_path(dir: &Path) -> Result<PathBuf> {
    let mut candidates = discover_config_files(dir)?;
    match candidates.len() {
        0 => anyhow::bail!(
            "No config documents found in {}. Pass a path as the first argument.",
            dir.display()
        ),
        1 => {
            let only = candidates.remove(0);
            println!("Using config {}", only.display());
            return Ok(only);
        }
        _ => {}
    }

    println!("Select a config:");
    for (i, path) in candidates.iter().enumerate() {
        println!("{}. {}", i + 1, path.display());
    }
    let input = read_line("Enter your choice: ")?;
    let index: usize = input
        .parse()
        .with_context(|| format!("'{}' is not a number", input))?;
    if index == 0 || index > candidates.len() {
        anyhow::bail!("Invalid choice {}", index);
    }
    Ok(candidates.swap_remove(index - 1))
}

/// Asks a yes/no question; anything but y/yes is a no
fn prompt_yes_no(question: &str) -> errors::Result<bool> {
    let answer = read_line(&format!("{} [y/N]: ", question))
        .map_err(|e| errors::AppError::InvalidInput(e.to_string()))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

fn read_line(prompt: &str) -> Result<String> {
    use std::io::{Write, stdin, stdout};

    print!("{}", prompt);
    stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    stdin().read_line(&mut input).context("Failed to read user input")?;
    Ok(input.trim().to_string())
}
