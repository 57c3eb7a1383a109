//! Local Ollama model store.
//!
//! The layout is owned by Ollama itself:
//!
//! ```text
//! models/
//! ├── manifests/{host}/{namespace}/{model}/{tag}   (JSON manifest)
//! └── blobs/sha256-{hex}                           (config and layer blobs)
//! ```

use std::path::{Path, PathBuf};

use ollie_core::error::{OllieError, Result};

use super::manifest::Manifest;
use super::reference::ModelReference;
use crate::archive::{extract_archive, write_archive, ArchiveOutput, ExtractSummary};
use crate::ownership::Ownership;

/// Directory holding content-addressed blobs.
pub const BLOBS_DIR: &str = "blobs";

/// Result of a save.
#[derive(Debug, Clone)]
pub struct SaveSummary {
    /// Model that was archived
    pub reference: ModelReference,
    /// Number of files in the archive (manifest included)
    pub files: usize,
    /// Total size of archived file content
    pub bytes: u64,
}

/// Handle on a models directory.
#[derive(Debug, Clone)]
pub struct ModelStore {
    root: PathBuf,
}

impl ModelStore {
    /// Open a store rooted at `root`. Nothing is read or created.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a model's manifest.
    pub fn manifest_path(&self, reference: &ModelReference) -> PathBuf {
        self.root.join(reference.manifest_path())
    }

    /// Files making up a model, relative to the store root.
    ///
    /// The manifest comes first, followed by the config blob and the layer
    /// blobs in manifest order. The manifest must exist.
    pub fn model_files(&self, reference: &ModelReference) -> Result<Vec<PathBuf>> {
        let manifest = Manifest::from_path(&self.manifest_path(reference))?;

        let mut files = vec![reference.manifest_path()];
        files.extend(
            manifest
                .blob_names()
                .into_iter()
                .map(|name| Path::new(BLOBS_DIR).join(name)),
        );

        Ok(files)
    }

    /// Stream a model as a tar archive into `out`.
    ///
    /// Refuses interactive terminals before touching the store.
    pub fn save<W: ArchiveOutput>(&self, name: &str, out: W) -> Result<SaveSummary> {
        if out.is_interactive() {
            return Err(OllieError::RefusedTerminalOutput);
        }

        let reference = ModelReference::parse(name)?;
        let files = self.model_files(&reference)?;

        tracing::debug!(
            model = %reference,
            root = %self.root.display(),
            files = files.len(),
            "Saving model"
        );

        let written = write_archive(&self.root, &files, out)?;

        tracing::info!(
            model = %reference,
            files = written.entries,
            bytes = written.bytes,
            "Saved model"
        );

        Ok(SaveSummary {
            reference,
            files: written.entries,
            bytes: written.bytes,
        })
    }

    /// Extract a model archive into the store.
    pub fn load(&self, archive: &Path, ownership: &Ownership) -> Result<ExtractSummary> {
        let summary = extract_archive(archive, &self.root, ownership)?;

        tracing::info!(
            archive = %archive.display(),
            root = %self.root.display(),
            codec = summary.codec,
            files = summary.files,
            bytes = summary.bytes,
            "Loaded model archive"
        );

        Ok(summary)
    }
}
