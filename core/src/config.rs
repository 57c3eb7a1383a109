//! Model store configuration.
//!
//! Resolves where Ollama keeps its models and which account should own
//! files written into that directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{OllieError, Result};

/// Environment variable that overrides the models directory.
pub const MODELS_DIR_ENV: &str = "OLLAMA_MODELS";

/// Models directory used by system-wide (service) installs.
pub const SYSTEM_MODELS_DIR: &str = "/usr/share/ollama/.ollama/models";

/// User and group that own the models directory of a service install.
pub const SERVICE_ACCOUNT: &str = "ollama";

/// Where models live and who owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root of the model store (contains `manifests/` and `blobs/`)
    pub models_dir: PathBuf,

    /// Account name used for ownership of extracted files
    pub service_account: String,
}

impl StoreConfig {
    /// Resolve the store configuration from the process environment.
    ///
    /// An explicit `models_dir` wins over everything else.
    pub fn resolve(models_dir: Option<PathBuf>) -> Result<Self> {
        let models_dir = match models_dir {
            Some(dir) => dir,
            None => resolve_models_dir(
                std::env::var_os(MODELS_DIR_ENV),
                Path::new(SYSTEM_MODELS_DIR),
                dirs::home_dir(),
            )?,
        };

        Ok(Self {
            models_dir,
            service_account: SERVICE_ACCOUNT.to_string(),
        })
    }
}

/// Pick the models directory.
///
/// Order: `env` (if non-empty), then `system_dir` if it exists, then
/// `~/.ollama/models`.
pub fn resolve_models_dir(
    env: Option<OsString>,
    system_dir: &Path,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = env.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    if std::fs::metadata(system_dir).is_ok() {
        return Ok(system_dir.to_path_buf());
    }

    let home = home.ok_or_else(|| {
        OllieError::ConfigError("failed to get home directory".to_string())
    })?;
    Ok(home.join(".ollama").join("models"))
}
