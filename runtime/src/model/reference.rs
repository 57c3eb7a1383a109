//! Ollama model name parsing.
//!
//! Parses model names like `llama2`, `library/llama2:7b` or
//! `registry.ollama.ai/library/llama2:latest` into their four components.

use std::path::PathBuf;
use std::sync::LazyLock;

use ollie_core::error::{OllieError, Result};
use regex::Regex;

/// Default registry when none is specified.
pub const DEFAULT_HOST: &str = "registry.ollama.ai";

/// Default namespace when none is specified.
pub const DEFAULT_NAMESPACE: &str = "library";

/// Default tag when none is specified.
pub const DEFAULT_TAG: &str = "latest";

/// Accepted name shapes, most specific first. The first match wins.
const SHAPES: &[&str] = &[
    // host/namespace/model:tag
    r"^(?P<host>[^/]+)/(?P<namespace>[^/]+)/(?P<model>[^:]+):(?P<tag>.+)$",
    // namespace/model:tag
    r"^(?P<namespace>[^/]+)/(?P<model>[^:]+):(?P<tag>.+)$",
    // namespace/model
    r"^(?P<namespace>[^/]+)/(?P<model>[^:]+)$",
    // model:tag
    r"^(?P<model>[^:]+):(?P<tag>.+)$",
    // model
    r"^(?P<model>[^:]+)$",
];

static SHAPE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SHAPES
        .iter()
        .map(|pattern| Regex::new(pattern).expect("model name shape is a valid regex"))
        .collect()
});

/// Fully-qualified model reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReference {
    /// Registry hostname (e.g., "registry.ollama.ai")
    pub host: String,
    /// Namespace (e.g., "library")
    pub namespace: String,
    /// Model name (e.g., "llama2")
    pub model: String,
    /// Tag (e.g., "latest", "7b")
    pub tag: String,
}

impl ModelReference {
    /// Parse a model name.
    ///
    /// Supports formats:
    /// - `llama2` → registry.ollama.ai/library/llama2:latest
    /// - `llama2:7b` → registry.ollama.ai/library/llama2:7b
    /// - `myuser/mymodel` → registry.ollama.ai/myuser/mymodel:latest
    /// - `myuser/mymodel:v1` → registry.ollama.ai/myuser/mymodel:v1
    /// - `example.com/myuser/mymodel:v1` → example.com/myuser/mymodel:v1
    pub fn parse(name: &str) -> Result<Self> {
        for pattern in SHAPE_PATTERNS.iter() {
            let Some(caps) = pattern.captures(name) else {
                continue;
            };

            let field = |group: &str, default: &str| {
                caps.name(group)
                    .map_or_else(|| default.to_string(), |m| m.as_str().to_string())
            };

            return Ok(Self {
                host: field("host", DEFAULT_HOST),
                namespace: field("namespace", DEFAULT_NAMESPACE),
                model: field("model", ""),
                tag: field("tag", DEFAULT_TAG),
            });
        }

        Err(OllieError::InvalidReference(name.to_string()))
    }

    /// Manifest location relative to the models directory.
    pub fn manifest_path(&self) -> PathBuf {
        PathBuf::from("manifests")
            .join(&self.host)
            .join(&self.namespace)
            .join(&self.model)
            .join(&self.tag)
    }

    /// Get the full reference string.
    pub fn full_reference(&self) -> String {
        format!(
            "{}/{}/{}:{}",
            self.host, self.namespace, self.model, self.tag
        )
    }
}

impl std::str::FromStr for ModelReference {
    type Err = OllieError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ModelReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_reference())
    }
}
