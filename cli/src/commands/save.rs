//! `ollie save` command - Write a model to stdout as a tar archive.
//!
//! The archive holds the manifest and every blob it references, under the
//! same relative paths they have in the models directory.

use std::path::PathBuf;

use clap::Args;
use ollie_core::OllieError;
use ollie_runtime::{ArchiveOutput, ModelStore};

#[derive(Args)]
pub struct SaveArgs {
    /// Model to save (e.g., "llama2", "library/llama2:latest")
    pub model: String,
}

pub async fn execute(
    args: SaveArgs,
    models_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout().lock();
    save_model(&args.model, stdout, || {
        super::open_model_store(models_dir).map(|(_, store)| store)
    })
}

/// Save `model` into `out`, opening the store only once `out` is known
/// not to be a terminal.
fn save_model<W, F>(model: &str, out: W, open_store: F) -> Result<(), Box<dyn std::error::Error>>
where
    W: ArchiveOutput,
    F: FnOnce() -> Result<ModelStore, Box<dyn std::error::Error>>,
{
    if out.is_interactive() {
        return Err(terminal_refusal(model));
    }

    let store = open_store()?;
    match store.save(model, out) {
        Ok(_) => Ok(()),
        Err(OllieError::RefusedTerminalOutput) => Err(terminal_refusal(model)),
        Err(e) => Err(e.into()),
    }
}

fn terminal_refusal(model: &str) -> Box<dyn std::error::Error> {
    format!(
        "{}\nPlease redirect output to a file: ollie save {} > output.tar",
        OllieError::RefusedTerminalOutput,
        model
    )
    .into()
}
