//! CLI administration tool for qr-shortener.
//!
//! Inspects and maintains the configured store without going through HTTP.
//!
//! # Usage
//!
//! ```bash
//! # List the most recent QR codes
//! cargo run --bin admin -- list --limit 20
//!
//! # Show one record
//! cargo run --bin admin -- show AB12cd
//!
//! # Show counters
//! cargo run --bin admin -- count
//!
//! # Remove records older than 30 days (and their images)
//! cargo run --bin admin -- prune --days 30
//! ```
//!
//! # Environment Variables
//!
//! Uses the same variables as the server (`STORAGE_BACKEND`, `DATA_DIR`,
//! `QR_DIR`, `DATABASE_URL`, `RETENTION_DAYS`, ...).

use qr_shortener::application::services::RedirectService;
use qr_shortener::config::{self, Config, MAX_RETENTION_DAYS};
use qr_shortener::domain::entities::{RedirectRecord, RetentionPolicy};
use qr_shortener::domain::repositories::{CounterRepository, RedirectRepository};
use qr_shortener::domain::retention_worker::sweep_once;
use qr_shortener::infrastructure::rendering::ImageStore;
use qr_shortener::server::Storage;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing qr-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored QR codes, newest first
    List {
        /// Maximum number of records to show
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// Show a single record
    Show {
        /// Short code
        code: String,
    },

    /// Show the generation counter and record count
    Count,

    /// Remove expired records and their images
    Prune {
        /// Age in days (defaults to RETENTION_DAYS)
        #[arg(short, long)]
        days: Option<u32>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let storage = Storage::open(&config).await?;

    match cli.command {
        Commands::List { limit } => list_records(&storage, &config, limit).await?,
        Commands::Show { code } => show_record(&storage, &config, &code).await?,
        Commands::Count => show_count(&storage).await?,
        Commands::Prune { days, yes } => prune(&storage, &config, days, yes).await?,
    }

    Ok(())
}

/// Lists records in a table.
///
/// # Output Format
///
/// ```text
/// 📋 QR Codes
///
///   Code     Name                   Created            Destination
///   ───────────────────────────────────────────────────────────────────
///   AB12cd   Example                2025-01-15 10:30   https://example.com/
/// ```
async fn list_records(storage: &Storage, config: &Config, limit: usize) -> Result<()> {
    println!("{}", "📋 QR Codes".bright_blue().bold());
    println!();

    let service = storage.redirect_service(config);
    let records = service
        .recent(limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list records: {}", e))?;

    if records.is_empty() {
        println!("{}", "  No QR codes found".yellow());
        return Ok(());
    }

    println!(
        "  {:<8} {:<22} {:<18} {}",
        "Code".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    let retention = service.retention();
    let now = Utc::now();
    for record in &records {
        let code = if retention.is_expired(record.created_at, now) {
            record.code.red()
        } else {
            record.code.green()
        };

        println!(
            "  {:<8} {:<22} {:<18} {}",
            code,
            truncate(&record.display_name, 22).cyan(),
            record
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            record.destination_url
        );
    }

    let total = service
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count records: {}", e))?;

    println!();
    println!(
        "  Showing {} of {}",
        records.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_record(storage: &Storage, config: &Config, code: &str) -> Result<()> {
    let record = storage
        .redirects
        .lookup(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to look up code: {}", e))?
        .with_context(|| format!("Code '{}' not found", code))?;

    let expired = config
        .retention_policy()
        .is_expired(record.created_at, Utc::now());

    println!("{}", "🔎 QR Code".bright_blue().bold());
    println!();
    println!("  Code:        {}", record.code.bright_yellow().bold());
    println!("  Name:        {}", record.display_name.cyan());
    println!("  Destination: {}", record.destination_url);
    println!("  Redirect:    {}", redirect_for(config, &record));
    println!(
        "  Image:       {}",
        config.qr_dir.join(&record.filename).display()
    );
    println!(
        "  Created:     {}",
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Status:      {}",
        if expired { "EXPIRED".red() } else { "ACTIVE".green() }
    );
    println!();

    Ok(())
}

async fn show_count(storage: &Storage) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let generated = storage
        .counter
        .current()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read counter: {}", e))?;
    let records = storage
        .redirects
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count records: {}", e))?;

    println!(
        "  Generated:      {}",
        generated.to_string().bright_green().bold()
    );
    println!(
        "  Stored records: {}",
        records.to_string().bright_green().bold()
    );
    println!("  Storage:        {}", storage.backend.bright_white());
    println!();

    Ok(())
}

/// Removes records older than `days` (or `RETENTION_DAYS`) after confirmation.
///
/// Image deletion failures are reported but do not stop the prune.
async fn prune(storage: &Storage, config: &Config, days: Option<u32>, yes: bool) -> Result<()> {
    println!("{}", "🧹 Prune Expired QR Codes".bright_blue().bold());
    println!();

    let days = days
        .or(config.retention_days)
        .filter(|d| (1..=MAX_RETENTION_DAYS).contains(d))
        .with_context(|| format!("Pass --days N (1-{MAX_RETENTION_DAYS}) or set RETENTION_DAYS"))?;
    let policy = RetentionPolicy::from_days(Some(days));

    let service = RedirectService::new(storage.redirects.clone()).with_retention(policy);

    let now = Utc::now();
    let candidates = service
        .recent(usize::MAX)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list records: {}", e))?
        .into_iter()
        .filter(|r| policy.is_expired(r.created_at, now))
        .count();

    if candidates == 0 {
        println!("{}", format!("  Nothing older than {} days", days).yellow());
        return Ok(());
    }

    println!(
        "  {} records older than {} days will be removed with their images",
        candidates.to_string().bright_yellow().bold(),
        days
    );
    println!();

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Remove these records?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let images = ImageStore::open(&config.qr_dir)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open image directory: {}", e))?;
    let removed = sweep_once(&service, &images)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prune: {}", e))?;

    println!();
    println!(
        "{}",
        format!("✅ Removed {} records", removed).green().bold()
    );
    println!();

    Ok(())
}

fn redirect_for(config: &Config, record: &RedirectRecord) -> String {
    match config.public_base_url {
        Some(ref base) => format!("{}{}", base.trim_end_matches('/'), record.redirect_path()),
        None => record.redirect_path(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
