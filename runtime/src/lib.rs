//! Ollie Runtime - model store access and archive streaming.
//!
//! Resolves model names to the files Ollama keeps on disk, streams them
//! into tar archives, and extracts such archives back into a store.

pub mod archive;
pub mod model;
pub mod ownership;

// Re-export common types
pub use archive::{extract_archive, write_archive, ArchiveOutput, ExtractSummary};
pub use model::{Manifest, ModelReference, ModelStore, SaveSummary};
pub use ownership::{AccountLookup, ChownOutcome, Ownership, ServiceAccount};
