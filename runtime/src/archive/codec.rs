//! Archive compression detection.
//!
//! The codec is chosen from the archive's file name suffix. Supporting a
//! new compression means adding one entry to [`CODECS`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use ollie_core::error::{OllieError, Result};
use xz2::read::XzDecoder;

type OpenFn = fn(File) -> Box<dyn Read>;

/// A decompression codec for tar archives.
pub struct Codec {
    /// Short name used in logs
    pub name: &'static str,
    suffixes: &'static [&'static str],
    open: OpenFn,
}

/// Known codecs, matched by file name suffix.
pub const CODECS: &[Codec] = &[
    Codec {
        name: "xz",
        suffixes: &[".tar.xz"],
        open: open_xz,
    },
    Codec {
        name: "gzip",
        suffixes: &[".tar.gz"],
        open: open_gzip,
    },
    Codec {
        name: "bzip2",
        suffixes: &[".tar.bz2", ".tar.bz"],
        open: open_bzip2,
    },
    Codec {
        name: "none",
        suffixes: &[".tar"],
        open: open_plain,
    },
];

fn open_xz(file: File) -> Box<dyn Read> {
    Box::new(XzDecoder::new_multi_decoder(BufReader::new(file)))
}

fn open_gzip(file: File) -> Box<dyn Read> {
    Box::new(MultiGzDecoder::new(BufReader::new(file)))
}

fn open_bzip2(file: File) -> Box<dyn Read> {
    Box::new(MultiBzDecoder::new(BufReader::new(file)))
}

fn open_plain(file: File) -> Box<dyn Read> {
    Box::new(BufReader::new(file))
}

impl Codec {
    /// Select the codec for an archive path.
    pub fn for_path(path: &Path) -> Result<&'static Codec> {
        let name = path.to_string_lossy();
        CODECS
            .iter()
            .find(|codec| codec.suffixes.iter().any(|s| name.ends_with(s)))
            .ok_or_else(|| OllieError::UnsupportedFormat(path.display().to_string()))
    }

    /// Wrap an opened archive file in this codec's decoder.
    pub fn decoder(&self, file: File) -> Box<dyn Read> {
        (self.open)(file)
    }
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("name", &self.name)
            .field("suffixes", &self.suffixes)
            .finish()
    }
}
