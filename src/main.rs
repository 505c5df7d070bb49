use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use unitofwork::recipes::salesforce_sdk;
use unitofwork::recipes::{FunctionInput, SalesforceSdkFunction, UnitOfWorkFunction};
use unitofwork::{Context, DataApi, DataApiConfig, InMemoryDataStore, InvocationEvent};

#[derive(Parser)]
#[command(name = "unitofwork")]
#[command(about = "Run the Data API functions against an in-memory org")]
struct Cli {
    /// Override the default string length limit
    #[arg(long, global = true)]
    string_max_length: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account, contact, case and tasks in one unit of work
    Run {
        /// Payload file, or `-` for stdin
        #[arg(long)]
        payload: PathBuf,
    },
    /// Create a single account and read it back
    CreateAccount {
        /// Payload file, or `-` for stdin
        #[arg(long)]
        payload: PathBuf,
    },
    /// Print the configured API version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.string_max_length)?;

    match cli.command {
        Command::Run { payload } => {
            let input: FunctionInput = read_payload(&payload)?;
            let context = in_memory_context(config);
            let event = InvocationEvent::new("urn:event:from:local/cli", input);
            let output = UnitOfWorkFunction::new().apply(&event, &context).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::CreateAccount { payload } => {
            let input: salesforce_sdk::FunctionInput = read_payload(&payload)?;
            let context = in_memory_context(config);
            let event = InvocationEvent::new("urn:event:from:local/cli", input);
            let output = SalesforceSdkFunction::new().apply(&event, &context).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Version => {
            println!("Data API v{} at {}", config.api_version, config.base_url());
        }
    }
    Ok(())
}

/// Environment configuration with command-line overrides applied, validated
/// after the overrides
fn load_config(string_max_length: Option<usize>) -> Result<DataApiConfig> {
    let mut config = DataApiConfig::from_env().context("loading DATA_API_* configuration")?;
    if let Some(max) = string_max_length {
        config = config.default_string_max_length(max);
    }
    config.validate().context("validating configuration")?;
    Ok(config)
}

fn in_memory_context(config: DataApiConfig) -> Context {
    let store = Arc::new(InMemoryDataStore::new(config.clone()));
    Context::with_data_api(DataApi::from_store(store, config))
}

fn read_payload<T: DeserializeOwned>(payload: &Path) -> Result<T> {
    let raw = if payload.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading payload from stdin")?;
        buf
    } else {
        fs::read_to_string(payload)
            .with_context(|| format!("reading payload {}", payload.display()))?
    };
    serde_json::from_str(&raw).context("decoding payload")
}
