//! Campaign Sequences: operator tool for inspecting stored email campaigns.
//!
//! Loads configuration, connects the configured store and reports an owner's
//! campaigns with their validation state.

use campaign_core::config::{AppConfig, StoreBackend};
use campaign_sequence::{CampaignRegistry, TriggerCatalog};
use campaign_store::build_store;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-sequences")]
#[command(about = "Inspect multi-step email campaigns")]
#[command(version)]
struct Cli {
    /// Storage backend (overrides config)
    #[arg(long, env = "CAMPAIGN_SEQUENCES__STORE__BACKEND", value_parser = parse_backend)]
    backend: Option<StoreBackend>,

    /// Redis URL (overrides config)
    #[arg(long, env = "CAMPAIGN_SEQUENCES__STORE__REDIS__URL")]
    redis_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List an owner's campaigns with status and validation issues
    List {
        #[arg(long)]
        owner: String,
    },
    /// Dashboard counters for an owner
    Stats {
        #[arg(long)]
        owner: String,
    },
    /// Print the trigger catalog
    Triggers,
}

fn parse_backend(s: &str) -> Result<StoreBackend, String> {
    match s {
        "memory" => Ok(StoreBackend::Memory),
        "redis" => Ok(StoreBackend::Redis),
        other => Err(format!("unknown backend '{other}' (expected memory or redis)")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "campaign_sequences=info,campaign_sequence=info,campaign_store=info".into()
            }),
        )
        .json()
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(backend) = cli.backend {
        config.store.backend = backend;
    }
    if let Some(url) = cli.redis_url {
        config.store.redis.url = url;
    }

    info!(backend = ?config.store.backend, "Configuration loaded");

    let store = build_store(&config.store).await?;
    let registry = CampaignRegistry::new(store).with_config(config.workflow.clone());

    match cli.command {
        Command::List { owner } => {
            for campaign in registry.list(&owner).await? {
                println!(
                    "{}  {:<8} {:>2} step(s)  {}",
                    campaign.id,
                    campaign.status(),
                    campaign.steps().len(),
                    campaign.settings.name
                );
                if !campaign.settings.description.is_empty() {
                    println!("    {}", campaign.settings.description);
                }
                for issue in campaign.validate() {
                    println!("    {issue}");
                }
            }
        }
        Command::Stats { owner } => {
            let stats = registry.stats(&owner).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Triggers => {
            println!("{}", serde_json::to_string_pretty(&TriggerCatalog::all())?);
        }
    }

    Ok(())
}
