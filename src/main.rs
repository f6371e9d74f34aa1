//! Model Janitor - Main entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use model_janitor::{
    Inventory, JanitorConfig, JanitorError, ModelFilter, ModelGroup, ModelSource, api, metrics,
    summarize,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "model-janitor")]
#[command(about = "Inventory and clean up locally cached ML models", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the HuggingFace hub cache directory
    #[arg(long, global = true)]
    hf_cache: Option<PathBuf>,

    /// Override the llama.cpp cache directory
    #[arg(long, global = true)]
    llamacpp_cache: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Defaults to info for
    /// `serve` and warn otherwise.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (json or pretty)
    #[arg(long, default_value = "pretty", global = true)]
    log_format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List cached models, largest first
    List {
        /// Only show one source (huggingface or llamacpp)
        #[arg(long)]
        source: Option<ModelSource>,

        /// Case-insensitive match on model name or subtitle
        #[arg(long)]
        search: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show totals across all caches
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Delete every file of a model
    Delete {
        /// Model id as printed by `list`
        id: String,

        /// Source of the model, needed when the id exists in both caches
        #[arg(long)]
        source: Option<ModelSource>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Serve the inventory over HTTP
    Serve {
        /// Override API port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    let log_level = cli.log_level.as_deref().unwrap_or(default_level);

    // Logs go to stderr so `list --json` stays machine-readable
    match cli.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(log_level)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(log_level)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    // Load configuration
    let mut config = JanitorConfig::load(cli.config)?;

    // CLI overrides
    if let Some(dir) = cli.hf_cache {
        config.hf_cache_dir = dir;
    }
    if let Some(dir) = cli.llamacpp_cache {
        config.llamacpp_cache_dir = dir;
    }
    if let Command::Serve { port: Some(port) } = cli.command {
        config.api_port = port;
    }

    config.validate()?;

    tracing::debug!(
        hf_cache_dir = ?config.hf_cache_dir,
        llamacpp_cache_dir = ?config.llamacpp_cache_dir,
        "Configuration loaded"
    );

    let inventory = Inventory::from_config(&config);

    match cli.command {
        Command::List {
            source,
            search,
            json,
        } => {
            let filter = ModelFilter {
                source,
                query: search,
            };
            let groups = filter.apply(inventory.scan_all().await);

            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else if groups.is_empty() {
                println!("No models found");
            } else {
                print_table(&groups);
            }
        }
        Command::Stats { json } => {
            let summary = summarize(&inventory.scan_all().await);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Total models:  {}", summary.total_models);
                println!("Total size:    {}", summary.size_formatted);
                println!("Hugging Face:  {}", summary.huggingface_count);
                println!("llama.cpp:     {}", summary.llamacpp_count);
            }
        }
        Command::Delete { id, source, yes } => {
            let group = match inventory.find(&id, source).await {
                Ok(group) => group,
                Err(JanitorError::AmbiguousId { .. }) => anyhow::bail!(
                    "Model id '{}' exists in both caches; pass --source huggingface or --source llamacpp",
                    id
                ),
                Err(e) => return Err(e.into()),
            };

            if !yes && !confirm_delete(&group)? {
                println!("Aborted");
                return Ok(());
            }

            if !inventory.delete(&group).await {
                anyhow::bail!(
                    "Failed to delete '{}'; some files may already be gone, run `list` to see what remains",
                    group.repo
                );
            }

            println!(
                "Deleted {} from {} ({})",
                group.repo, group.source, group.size_formatted
            );
        }
        Command::Serve { .. } => serve(config, inventory).await?,
    }

    Ok(())
}

fn print_table(groups: &[ModelGroup]) {
    let header = |title: &str| {
        Cell::new(title)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold)
    };

    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            header("Model"),
            header("Files"),
            header("Size"),
            header("Type"),
            header("Source"),
            header("Modified"),
            header("ID"),
        ]);

    for group in groups {
        table.add_row(vec![
            Cell::new(&group.repo).fg(Color::Green),
            Cell::new(group.subtitle.as_deref().unwrap_or("")),
            Cell::new(&group.size_formatted)
                .fg(Color::Blue)
                .set_alignment(CellAlignment::Right),
            Cell::new(group.group_type).set_alignment(CellAlignment::Center),
            Cell::new(group.source).fg(Color::Yellow),
            Cell::new(group.last_modified.format("%Y-%m-%d %H:%M")),
            Cell::new(&group.id),
        ]);
    }

    println!("{table}");
}

fn confirm_delete(group: &ModelGroup) -> Result<bool> {
    let count = group.files.len();
    print!(
        "Delete \"{}\" from {}? This removes {} file{} ({}). [y/N] ",
        group.repo,
        group.source,
        count,
        if count == 1 { "" } else { "s" },
        group.size_formatted
    );
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn serve(config: JanitorConfig, inventory: Inventory) -> Result<()> {
    tracing::info!("Starting Model Janitor API");

    let prometheus_handle = metrics::setup_metrics()?;

    let app_state = api::AppState {
        inventory: Arc::new(inventory),
        prometheus_handle,
    };
    let app = api::create_router(app_state);

    let listener = tokio::net::TcpListener::bind((config.api_host.as_str(), config.api_port))
        .await
        .context("Failed to bind API server")?;
    tracing::info!(addr = %listener.local_addr()?, "Starting API server");

    // Graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
