use thiserror::Error;

/// Ollie error types
#[derive(Error, Debug)]
pub enum OllieError {
    /// Model name matched none of the accepted shapes
    #[error("invalid model name format: {0}")]
    InvalidReference(String),

    /// Manifest file could not be read
    #[error("failed to read manifest: {0}")]
    ManifestReadError(String),

    /// Manifest content is not a JSON manifest
    #[error("failed to parse manifest: {0}")]
    ManifestParseError(String),

    /// Writing the save archive failed
    #[error("archive write failed: {0}")]
    ArchiveWriteError(String),

    /// Save output is attached to an interactive terminal
    #[error("refusing to write binary tarball to terminal")]
    RefusedTerminalOutput,

    /// Archive file name carries no known suffix
    #[error("unsupported file extension for {0}")]
    UnsupportedFormat(String),

    /// Opening, decoding or reading the load archive failed
    #[error("archive read failed: {0}")]
    ArchiveReadError(String),

    /// Writing an extracted entry (or its ownership) failed
    #[error("extraction failed: {0}")]
    ExtractWriteError(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for OllieError {
    fn from(err: serde_json::Error) -> Self {
        OllieError::ManifestParseError(err.to_string())
    }
}

/// Result type alias for ollie operations
pub type Result<T> = std::result::Result<T, OllieError>;
