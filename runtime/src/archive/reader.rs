//! Tar archive extraction for `load`.
//!
//! Entries are written one by one in archive order. There is no staging
//! directory: a failure partway through leaves the entries extracted so far.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Component, Path, PathBuf};

use ollie_core::error::{OllieError, Result};
use tar::{Archive, Entry};

use super::codec::Codec;
use crate::ownership::Ownership;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Totals for an extracted archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Codec the archive was decoded with
    pub codec: &'static str,
    /// Regular files written
    pub files: usize,
    /// Directory entries created
    pub directories: usize,
    /// Entries of other kinds that were ignored
    pub skipped: usize,
    /// Bytes of file content written
    pub bytes: u64,
}

/// Extract a (possibly compressed) tar archive into `dest`.
///
/// # Errors
///
/// Returns error if:
/// - The archive suffix is not a known codec (nothing is touched)
/// - The archive cannot be opened, decoded or read
/// - An entry name is absolute or climbs out of `dest`
/// - A directory or file cannot be created, written or chowned
pub fn extract_archive(
    archive_path: &Path,
    dest: &Path,
    ownership: &Ownership,
) -> Result<ExtractSummary> {
    let codec = Codec::for_path(archive_path)?;

    let file = File::open(archive_path).map_err(|e| {
        OllieError::ArchiveReadError(format!(
            "failed to open file {}: {}",
            archive_path.display(),
            e
        ))
    })?;

    let mut archive = Archive::new(codec.decoder(file));
    let entries = archive.entries().map_err(|e| {
        OllieError::ArchiveReadError(format!("failed to read tar header: {}", e))
    })?;

    let mut summary = ExtractSummary {
        codec: codec.name,
        ..Default::default()
    };

    for entry in entries {
        let mut entry = entry.map_err(|e| {
            OllieError::ArchiveReadError(format!("failed to read tar header: {}", e))
        })?;

        let rel_path = entry_path(&entry)?;
        let target = dest.join(&rel_path);
        let kind = entry.header().entry_type();

        if is_directory(&entry) {
            std::fs::create_dir_all(&target).map_err(|e| {
                OllieError::ExtractWriteError(format!(
                    "failed to create directory {}: {}",
                    target.display(),
                    e
                ))
            })?;
            ownership.apply(&target)?;

            tracing::debug!(entry = %rel_path.display(), "Created directory");
            summary.directories += 1;
            continue;
        }

        if !(kind.is_file() || kind.is_contiguous() || kind.is_gnu_sparse()) {
            tracing::warn!(
                entry = %rel_path.display(),
                kind = ?kind,
                "Skipping unsupported archive entry"
            );
            summary.skipped += 1;
            continue;
        }

        if rel_path.as_os_str().is_empty() {
            return Err(OllieError::ArchiveReadError(
                "file entry with empty name".to_string(),
            ));
        }

        let bytes = extract_file(&mut entry, &target, ownership)?;

        tracing::debug!(entry = %rel_path.display(), size = bytes, "Extracted file");
        summary.files += 1;
        summary.bytes += bytes;
    }

    Ok(summary)
}

/// Pre-POSIX archives mark directories only by a trailing slash on a
/// regular entry.
fn is_directory<R: Read>(entry: &Entry<'_, R>) -> bool {
    let header = entry.header();
    header.entry_type().is_dir()
        || (header.as_ustar().is_none()
            && header.as_gnu().is_none()
            && entry.path_bytes().ends_with(b"/"))
}

/// Normalize an entry name, rejecting names that leave the destination.
fn entry_path<R: Read>(entry: &Entry<'_, R>) -> Result<PathBuf> {
    let path = entry.path().map_err(|e| {
        OllieError::ArchiveReadError(format!("invalid entry name: {}", e))
    })?;

    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(OllieError::ArchiveReadError(format!(
                    "entry {} escapes the destination directory",
                    path.display()
                )));
            }
        }
    }

    Ok(clean)
}

/// Write one regular file entry to `target`, returning its size.
fn extract_file<R: Read>(
    entry: &mut Entry<'_, R>,
    target: &Path,
    ownership: &Ownership,
) -> Result<u64> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            OllieError::ExtractWriteError(format!(
                "failed to create parent directory for {}: {}",
                target.display(),
                e
            ))
        })?;
        ownership.apply(parent)?;
    }

    let header = entry.header();
    let mode = header.mode().map_err(|e| {
        OllieError::ArchiveReadError(format!("invalid mode for {}: {}", target.display(), e))
    })? & 0o7777;
    let sparse = header.entry_type().is_gnu_sparse();
    let expected = entry.size();

    let mut out = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(target)
        .map_err(|e| {
            OllieError::ExtractWriteError(format!(
                "failed to create file {}: {}",
                target.display(),
                e
            ))
        })?;

    let written = copy_entry(entry, &mut out, target)?;
    if !sparse && written != expected {
        return Err(OllieError::ArchiveReadError(format!(
            "unexpected end of archive in {} ({} of {} bytes)",
            target.display(),
            written,
            expected
        )));
    }
    drop(out);

    ownership.apply(target)?;
    Ok(written)
}

/// Stream entry content into `out`, keeping read and write failures apart.
fn copy_entry<R: Read, W: Write>(entry: &mut R, out: &mut W, target: &Path) -> Result<u64> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let n = match entry.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(OllieError::ArchiveReadError(format!(
                    "failed to read {} from archive: {}",
                    target.display(),
                    e
                )))
            }
        };

        out.write_all(&buf[..n]).map_err(|e| {
            OllieError::ExtractWriteError(format!(
                "failed to write file {}: {}",
                target.display(),
                e
            ))
        })?;
        total += n as u64;
    }

    Ok(total)
}
