//! Ollie Core - shared types for the ollie workspace.
//!
//! Provides the error type and the model store configuration used by
//! the runtime and the CLI.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::StoreConfig;
pub use error::{OllieError, Result};

/// Ollie version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
