//! Tar archive creation for `save`.
//!
//! Entries are streamed one file at a time, so memory use stays bounded
//! regardless of blob size.

use std::fs::File;
use std::io::{BufWriter, IsTerminal, Stdout, StdoutLock, Write};
use std::path::{Path, PathBuf};

use ollie_core::error::{OllieError, Result};
use tar::{Builder, Header, HeaderMode};

const OUTPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Destination of a save archive.
pub trait ArchiveOutput: Write {
    /// Whether the stream is an interactive terminal.
    fn is_interactive(&self) -> bool;
}

impl ArchiveOutput for Stdout {
    fn is_interactive(&self) -> bool {
        self.is_terminal()
    }
}

impl ArchiveOutput for StdoutLock<'_> {
    fn is_interactive(&self) -> bool {
        self.is_terminal()
    }
}

impl ArchiveOutput for File {
    fn is_interactive(&self) -> bool {
        self.is_terminal()
    }
}

impl ArchiveOutput for Vec<u8> {
    fn is_interactive(&self) -> bool {
        false
    }
}

impl<W: ArchiveOutput + ?Sized> ArchiveOutput for &mut W {
    fn is_interactive(&self) -> bool {
        (**self).is_interactive()
    }
}

/// Totals for a written archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Number of entries written
    pub entries: usize,
    /// Sum of entry content sizes
    pub bytes: u64,
}

/// Write `files` (relative to `root`) into a tar stream on `out`.
///
/// Entry names are the relative paths; mode, size and mtime come from the
/// source files. The archive is finished and `out` flushed on success.
pub fn write_archive<W: Write>(root: &Path, files: &[PathBuf], out: W) -> Result<WriteSummary> {
    let mut builder = Builder::new(BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, out));
    let mut summary = WriteSummary::default();

    for rel_path in files {
        let abs_path = root.join(rel_path);

        let file = File::open(&abs_path).map_err(|e| {
            OllieError::ArchiveWriteError(format!(
                "failed to open {}: {}",
                abs_path.display(),
                e
            ))
        })?;

        let metadata = file.metadata().map_err(|e| {
            OllieError::ArchiveWriteError(format!(
                "failed to stat {}: {}",
                abs_path.display(),
                e
            ))
        })?;

        let mut header = Header::new_gnu();
        header.set_metadata_in_mode(&metadata, HeaderMode::Complete);

        builder
            .append_data(&mut header, rel_path, file)
            .map_err(|e| {
                OllieError::ArchiveWriteError(format!(
                    "failed to write {} to tarball: {}",
                    rel_path.display(),
                    e
                ))
            })?;

        tracing::debug!(
            entry = %rel_path.display(),
            size = metadata.len(),
            "Archived file"
        );

        summary.entries += 1;
        summary.bytes += metadata.len();
    }

    let buffered = builder.into_inner().map_err(|e| {
        OllieError::ArchiveWriteError(format!("failed to finalize archive: {}", e))
    })?;
    let mut out = buffered.into_inner().map_err(|e| {
        OllieError::ArchiveWriteError(format!("failed to flush archive: {}", e.error()))
    })?;
    out.flush().map_err(|e| {
        OllieError::ArchiveWriteError(format!("failed to flush archive: {}", e))
    })?;

    Ok(summary)
}
