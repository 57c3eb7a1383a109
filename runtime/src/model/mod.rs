//! Ollama model store access.
//!
//! - Model name parsing (`llama2` → `registry.ollama.ai/library/llama2:latest`)
//! - Manifest parsing (config and layer digests)
//! - Planning which files on disk make up a model

pub mod manifest;
pub mod reference;
pub mod store;

pub use manifest::{blob_name, Manifest};
pub use reference::ModelReference;
pub use store::{ModelStore, SaveSummary};
