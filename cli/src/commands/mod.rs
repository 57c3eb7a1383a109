//! CLI command definitions and dispatch.

mod load;
mod save;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ollie_core::StoreConfig;
use ollie_runtime::ModelStore;

/// Ollie: save and load Ollama models as tar archives.
#[derive(Parser)]
#[command(name = "ollie", version = ollie_core::VERSION, about)]
pub struct Cli {
    /// Ollama models directory (default: $OLLAMA_MODELS, the system
    /// install, then ~/.ollama/models)
    #[arg(long, global = true, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Write a model's manifest and blobs to stdout as a tar archive
    Save(save::SaveArgs),
    /// Extract a model archive into the models directory
    ///
    /// Only directories and regular files are extracted. Symlinks, hard
    /// links, devices and FIFOs are skipped with a warning. Entries with
    /// absolute paths or `..` components are rejected.
    Load(load::LoadArgs),
}

/// Resolve the store configuration and open the model store.
pub(crate) fn open_model_store(
    models_dir: Option<PathBuf>,
) -> Result<(StoreConfig, ModelStore), Box<dyn std::error::Error>> {
    let config = StoreConfig::resolve(models_dir)?;
    tracing::debug!(models_dir = %config.models_dir.display(), "Using models directory");
    let store = ModelStore::new(&config.models_dir);
    Ok((config, store))
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Save(args) => save::execute(args, cli.models_dir).await,
        Command::Load(args) => load::execute(args, cli.models_dir).await,
    }
}
