//! LeadForm CLI
//!
//! Generates embeddable lead forms and manages saved form configurations.
//!
//! # Usage
//!
//! ```bash
//! leadform generate -f consulenza.yaml -o form.html
//! leadform copy -f consulenza.yaml
//! leadform forms list --format json
//! leadform forms save -f consulenza.yaml --name "Landing"
//! leadform copy --id 5b0c4c1e-1f0e-4a55-b3a4-8d1c2f9e7a10
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod clipboard;
mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "leadform")]
#[command(author = "LeadForm")]
#[command(version)]
#[command(about = "LeadForm Command Line Interface", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "LEADFORM_API_URL")]
    api_url: Option<String>,

    /// Storage endpoint the generated forms submit to
    #[arg(long, env = "LEADFORM_STORAGE_ENDPOINT")]
    storage_endpoint: Option<String>,

    /// Public access key of the storage endpoint
    #[arg(long, env = "LEADFORM_STORAGE_KEY")]
    storage_key: Option<String>,

    /// Tenant ID
    #[arg(long, env = "LEADFORM_TENANT_ID")]
    tenant_id: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a form document
    Generate {
        #[command(flatten)]
        source: FormSource,
        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a form document and copy it to the clipboard
    Copy {
        #[command(flatten)]
        source: FormSource,
    },
    /// Manage saved form configurations
    Forms {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Where the form comes from: a local definition file or a saved form
#[derive(Args)]
#[group(required = true, multiple = false)]
struct FormSource {
    /// Form definition file (.yaml, .yml, .json or .toml)
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Saved form id, rendered by the API
    #[arg(long)]
    id: Option<String>,
}

#[derive(Subcommand)]
enum FormCommands {
    /// List saved forms
    List,
    /// Get saved form details
    Get { id: String },
    /// Save a form definition file, replacing the form when --id is given
    Save {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    /// Delete a saved form
    Delete { id: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    let settings = config::Config::load(profile)
        .unwrap_or_default()
        .overlay(cli.api_url, cli.storage_endpoint, cli.storage_key, cli.tenant_id);
    let format = cli.format.unwrap_or_else(|| settings.format());
    let client = commands::ApiClient::new(settings.api_url(), settings.tenant_id.as_deref());

    let result = match cli.command {
        Commands::Generate { source, output } => {
            commands::generate::generate(source, output, &settings, &client, format).await
        }
        Commands::Copy { source } => commands::generate::copy(source, &settings, &client).await,
        Commands::Forms { action } => commands::forms::handle(action, &client, format).await,
        Commands::Config { action } => commands::config::handle(action, profile).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
