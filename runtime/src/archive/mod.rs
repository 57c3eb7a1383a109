//! Tar archive streaming.
//!
//! `save` writes plain tar to a stream; `load` reads plain, gzip, bzip2
//! or xz compressed tar, picked by file suffix.

pub mod codec;
mod reader;
mod writer;

pub use codec::{Codec, CODECS};
pub use reader::{extract_archive, ExtractSummary};
pub use writer::{write_archive, ArchiveOutput, WriteSummary};
