//! Ollama manifest parsing.
//!
//! A manifest lists the config blob and layer blobs of one model tag.
//! Only the digests matter here; every other field is ignored.

use std::path::Path;

use ollie_core::error::{OllieError, Result};
use serde::Deserialize;

/// Hash algorithm assumed for digests that carry no algorithm tag.
const DEFAULT_ALGORITHM: &str = "sha256";

/// Blob descriptor inside a manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Descriptor {
    /// Content digest (e.g., "sha256:abc123...")
    #[serde(default)]
    pub digest: Option<String>,
}

/// Parsed model manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Model configuration blob
    #[serde(default)]
    pub config: Option<Descriptor>,

    /// Layer blobs (weights, template, params, ...)
    #[serde(default)]
    pub layers: Option<Vec<Descriptor>>,
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read(path).map_err(|e| {
            OllieError::ManifestReadError(format!("{}: {}", path.display(), e))
        })?;

        Self::from_slice(&content)
    }

    /// Parse manifest JSON.
    pub fn from_slice(content: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(content)?)
    }

    /// Blob file names referenced by this manifest, config first.
    ///
    /// Empty digests are skipped.
    pub fn blob_names(&self) -> Vec<String> {
        self.config
            .iter()
            .chain(self.layers.iter().flatten())
            .filter_map(|d| d.digest.as_deref())
            .filter(|digest| !digest.is_empty())
            .map(blob_name)
            .collect()
    }
}

/// On-disk blob file name for a digest: `sha256:abcd` → `sha256-abcd`.
pub fn blob_name(digest: &str) -> String {
    match digest.split_once(':') {
        Some((algorithm, hex)) => format!("{}-{}", algorithm, hex),
        None => format!("{}-{}", DEFAULT_ALGORITHM, digest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_blob_names_config_first() {
        let manifest = Manifest::from_slice(
            br#"{"config":{"digest":"sha256:aa"},"layers":[{"digest":"sha256:bb"},{"digest":"sha256:cc"}]}"#,
        )
        .unwrap();
        assert_eq!(
            manifest.blob_names(),
            vec!["sha256-aa", "sha256-bb", "sha256-cc"]
        );
    }

    #[test]
    fn test_blob_names_skip_empty_digests() {
        let manifest = Manifest::from_slice(
            br#"{"config":{"digest":""},"layers":[{"digest":"sha256:bb"},{"digest":""},{}]}"#,
        )
        .unwrap();
        assert_eq!(manifest.blob_names(), vec!["sha256-bb"]);
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let manifest = Manifest::from_slice(br#"{"schemaVersion":2}"#).unwrap();
        assert!(manifest.blob_names().is_empty());

        let manifest = Manifest::from_slice(br#"{"config":null,"layers":null}"#).unwrap();
        assert!(manifest.blob_names().is_empty());
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let manifest = Manifest::from_slice(
            br#"{
                "schemaVersion": 2,
                "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
                "config": {"mediaType": "application/vnd.docker.container.image.v1+json", "digest": "sha256:c0", "size": 485},
                "layers": [
                    {"mediaType": "application/vnd.ollama.image.model", "digest": "sha256:m0", "size": 3825819519},
                    {"mediaType": "application/vnd.ollama.image.license", "digest": "sha256:l0", "size": 7020}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(
            manifest.blob_names(),
            vec!["sha256-c0", "sha256-m0", "sha256-l0"]
        );
    }

    #[test]
    fn test_blob_name_normalization() {
        assert_eq!(blob_name("sha256:abcd"), "sha256-abcd");
        assert_eq!(blob_name("abcd"), "sha256-abcd");
        assert_eq!(blob_name("sha512:ef01"), "sha512-ef01");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Manifest::from_slice(b"not json").unwrap_err();
        assert!(matches!(err, OllieError::ManifestParseError(_)));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = Manifest::from_slice(br#"{"layers":{"digest":"sha256:aa"}}"#).unwrap_err();
        assert!(matches!(err, OllieError::ManifestParseError(_)));

        let err = Manifest::from_slice(br#"[1, 2, 3]"#).unwrap_err();
        assert!(matches!(err, OllieError::ManifestParseError(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latest");
        fs::write(&path, r#"{"config":{"digest":"sha256:aa"},"layers":[]}"#).unwrap();

        let manifest = Manifest::from_path(&path).unwrap();
        assert_eq!(manifest.blob_names(), vec!["sha256-aa"]);
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Manifest::from_path(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, OllieError::ManifestReadError(_)));
        assert!(err.to_string().contains("missing"));
    }
}
