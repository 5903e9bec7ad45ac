//! CLI administration tool for client-crud-api.
//!
//! Provides bulk import, client inspection and database diagnostics without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Import a CSV export (one client per row)
//! cargo run --bin admin -- import data/clients.csv
//!
//! # Show one client
//! cargo run --bin admin -- client show 42
//!
//! # List clients
//! cargo run --bin admin -- client list --skip 0 --limit 20
//!
//! # Delete a client
//! cargo run --bin admin -- client delete 42
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` or `DB_PATH`, and the `DB_*` pool settings.

use client_crud_api::application::services::{ClientService, ImportService};
use client_crud_api::config;
use client_crud_api::domain::entities::Client;
use client_crud_api::domain::repositories::ClientRepository;
use client_crud_api::infrastructure::persistence::{Database, SqliteClientRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing client-crud-api data.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Import clients from a CSV file
    Import {
        /// Path to the CSV file (header line required)
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Inspect and manage clients
    Client {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Client subcommands.
#[derive(Subcommand)]
enum ClientAction {
    /// Show one client with its meta, situation and contracts
    Show {
        /// Client ID
        id: i64,
    },

    /// List clients
    List {
        /// Number of clients to skip
        #[arg(long, default_value_t = 0)]
        skip: u32,

        /// Maximum number of clients to print
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Delete a client and everything it owns
    Delete {
        /// Client ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info and row counts
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let database = Arc::new(
        Database::connect(&config)
            .await
            .context("Failed to connect to database")?,
    );
    database
        .migrate()
        .await
        .context("Failed to apply migrations")?;

    let repo = Arc::new(SqliteClientRepository::new(database.clone()));

    let result = match cli.command {
        Commands::Import { file, yes } => import_csv(repo, file, yes).await,
        Commands::Client { action } => handle_client_action(action, repo).await,
        Commands::Db { action } => handle_db_action(action, repo).await,
    };

    database.close().await;
    result
}

/// Imports a CSV export after confirmation.
///
/// The file is fully parsed before anything is written; a bad row aborts
/// the whole import.
async fn import_csv(repo: Arc<SqliteClientRepository>, file: PathBuf, yes: bool) -> Result<()> {
    println!("{}", "📥 Import clients".bright_blue().bold());
    println!();
    println!("  File: {}", file.display().to_string().cyan());
    println!();

    let handle =
        File::open(&file).with_context(|| format!("Cannot open {}", file.display()))?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Import every row of this file?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let service = ImportService::new(repo);
    let report = service.import_csv(BufReader::new(handle)).await?;

    println!();
    println!("{}", "✅ Import complete!".green().bold());
    println!(
        "  Rows read:       {}",
        report.rows_read.to_string().bright_white()
    );
    println!(
        "  Clients stored:  {}",
        report.clients_stored.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Dispatches client commands.
async fn handle_client_action(
    action: ClientAction,
    repo: Arc<SqliteClientRepository>,
) -> Result<()> {
    let service = ClientService::new(repo);

    match action {
        ClientAction::Show { id } => {
            let client = service.get_client(id).await?;
            print_client(&client);
        }
        ClientAction::List { skip, limit } => {
            list_clients(&service, skip, limit).await?;
        }
        ClientAction::Delete { id, yes } => {
            delete_client(&service, id, yes).await?;
        }
    }

    Ok(())
}

async fn list_clients(
    service: &ClientService<SqliteClientRepository>,
    skip: u32,
    limit: u32,
) -> Result<()> {
    println!("{}", "📋 Clients".bright_blue().bold());
    println!();

    let clients = service
        .list_clients(i64::from(skip), i64::from(limit))
        .await?;

    if clients.is_empty() {
        println!("{}", "  No clients found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<8} {:<6} {:<8} {:<14} {:<10} {}",
        "ID".bold(),
        "AGE".bold(),
        "SMOKER".bold(),
        "INCOME".bold(),
        "CREATED".bold(),
        "CONTRACTS".bold()
    );
    println!("  {}", "─".repeat(64).bright_black());

    for client in &clients {
        let (age, smoker) = client
            .client_meta
            .as_ref()
            .map(|m| (m.age.to_string(), if m.smoker { "yes" } else { "no" }))
            .unwrap_or_else(|| ("-".to_string(), "-"));
        let income = client
            .client_situation
            .as_ref()
            .map(|s| s.revenu_estime_mois.to_string())
            .unwrap_or_else(|| "-".to_string());
        let created = client
            .date_creation_compte
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:<8} {:<6} {:<8} {:<14} {:<10} {}",
            client.id.to_string().cyan(),
            age,
            smoker,
            income,
            created.bright_black(),
            client.contrats.len()
        );
    }

    println!();
    println!(
        "  Shown: {}",
        clients.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Deletes a client after confirmation (default: No).
async fn delete_client(
    service: &ClientService<SqliteClientRepository>,
    id: i64,
    yes: bool,
) -> Result<()> {
    println!("{}", "🗑️  Delete client".bright_blue().bold());
    println!();

    let client = service.get_client(id).await?;
    print_client(&client);

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete this client and all its records?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let detail = service.delete_client(id).await?;

    println!();
    println!("{}", format!("✅ {}", detail).green().bold());
    println!();

    Ok(())
}

fn print_client(client: &Client) {
    println!("  {} {}", "Client".bright_white().bold(), client.id.to_string().cyan());
    if let Some(date) = client.date_creation_compte {
        println!("  Created:       {}", date);
    }

    match &client.client_meta {
        Some(meta) => {
            println!("  {}", "Meta".bright_white());
            println!("    Age:           {}", meta.age);
            println!("    Weight:        {}", meta.poids);
            println!("    Education:     {}", meta.niveau_etude);
            println!("    Smoker:        {}", meta.smoker);
            println!("    Children:      {}", meta.nb_enfants);
            println!("    CAF quotient:  {}", meta.quotient_caf);
            if let Some(status) = meta.situation_familiale {
                println!("    Marital:       {}", status);
            }
        }
        None => println!("  {}", "No meta record".yellow()),
    }

    match &client.client_situation {
        Some(situation) => {
            println!("  {}", "Situation".bright_white());
            println!("    Monthly income: {}", situation.revenu_estime_mois);
            println!("    Personal risk:  {}", situation.risque_personnel);
            if let Some(rent) = situation.loyer_mensuel {
                println!("    Monthly rent:   {}", rent);
            }
        }
        None => println!("  {}", "No situation record".yellow()),
    }

    println!("  {}", "Contracts".bright_white());
    if client.contrats.is_empty() {
        println!("    {}", "none".bright_black());
    }
    for contrat in &client.contrats {
        println!(
            "    #{:<6} {}",
            contrat.id.to_string().bright_black(),
            contrat.montant_pret
        );
    }
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, repo: Arc<SqliteClientRepository>) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            repo.ping().await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            println!("  SQLite: {}", repo.version().await?.bright_white());
            println!();

            for (table, count) in repo.table_counts().await? {
                println!(
                    "  {:<20} {}",
                    table,
                    count.to_string().bright_green().bold()
                );
            }
            println!();
        }
    }

    Ok(())
}
