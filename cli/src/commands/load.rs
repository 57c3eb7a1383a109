//! `ollie load` command - Extract a model archive into the models directory.

use std::path::PathBuf;

use clap::Args;
use ollie_runtime::Ownership;

#[derive(Args)]
pub struct LoadArgs {
    /// Archive to load (.tar, .tar.gz, .tar.bz, .tar.bz2 or .tar.xz)
    pub archive: PathBuf,
}

pub async fn execute(
    args: LoadArgs,
    models_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, store) = super::open_model_store(models_dir)?;
    let ownership = Ownership::for_account(&config.service_account);

    store.load(&args.archive, &ownership)?;

    eprintln!(
        "Successfully loaded model from {} to {}",
        args.archive.display(),
        store.root().display()
    );
    Ok(())
}
