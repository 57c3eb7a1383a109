//! Integration test: save a model with `ollie save`, load it back with
//! `ollie load`.
//!
//! Drives the built `ollie` binary against temporary model stores selected
//! through `OLLAMA_MODELS` / `--models-dir`.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const MANIFEST_REL: &str = "manifests/registry.ollama.ai/library/tinyllama/latest";
const CONFIG_BLOB: &str = "blobs/sha256-c0ffee";
const MODEL_BLOB: &str = "blobs/sha256-deadbeef";

/// Run `ollie` with the given models directory in the environment.
fn ollie(models_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ollie"))
        .args(args)
        .env("OLLAMA_MODELS", models_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run ollie")
}

fn populate(root: &Path) {
    let manifest = root.join(MANIFEST_REL);
    fs::create_dir_all(manifest.parent().unwrap()).unwrap();
    fs::write(
        &manifest,
        r#"{"schemaVersion":2,"config":{"digest":"sha256:c0ffee"},"layers":[{"digest":"sha256:deadbeef"}]}"#,
    )
    .unwrap();
    fs::create_dir_all(root.join("blobs")).unwrap();
    fs::write(root.join(CONFIG_BLOB), b"{\"model_format\":\"gguf\"}").unwrap();
    fs::write(root.join(MODEL_BLOB), vec![0x5a; 200_000]).unwrap();
}

/// Extraction chowns to the `ollama` account when it exists, which needs
/// privileges the test runner may not have.
fn service_account_present() -> bool {
    fs::read_to_string("/etc/passwd")
        .map(|passwd| passwd.lines().any(|l| l.starts_with("ollama:")))
        .unwrap_or(false)
}

#[test]
fn test_save_then_load_round_trip() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    populate(source.path());

    let saved = ollie(source.path(), &["save", "tinyllama"]);
    assert!(
        saved.status.success(),
        "save failed: {}",
        String::from_utf8_lossy(&saved.stderr)
    );

    let archive = work.path().join("tinyllama.tar");
    fs::write(&archive, &saved.stdout).unwrap();

    let mut saved_archive = tar::Archive::new(saved.stdout.as_slice());
    let saved_names: Vec<String> = saved_archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(saved_names, vec![MANIFEST_REL, CONFIG_BLOB, MODEL_BLOB]);

    if service_account_present() {
        eprintln!("skipping load half of round trip: extraction would chown to the ollama account");
        return;
    }

    let loaded = ollie(target.path(), &["load", archive.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&loaded.stderr);
    assert!(loaded.status.success(), "load failed: {stderr}");
    assert!(stderr.contains("Successfully loaded model from"));

    for rel in [MANIFEST_REL, CONFIG_BLOB, MODEL_BLOB] {
        let original = fs::read(source.path().join(rel)).unwrap();
        let restored = fs::read(target.path().join(rel)).unwrap();
        assert_eq!(original, restored, "{rel} differs after round trip");
    }
}

#[test]
fn test_save_archive_lists_manifest_then_blobs() {
    let source = TempDir::new().unwrap();
    populate(source.path());

    let saved = ollie(source.path(), &["save", "library/tinyllama:latest"]);
    assert!(saved.status.success());

    let mut archive = tar::Archive::new(saved.stdout.as_slice());
    let names: Vec<String> = archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec![MANIFEST_REL, CONFIG_BLOB, MODEL_BLOB]);
}

#[test]
fn test_models_dir_flag_overrides_environment() {
    let source = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();
    populate(source.path());

    let saved = ollie(
        empty.path(),
        &["save", "tinyllama", "--models-dir", source.path().to_str().unwrap()],
    );
    assert!(saved.status.success());
    assert!(!saved.stdout.is_empty());
}

#[test]
fn test_save_unknown_model_fails() {
    let store = TempDir::new().unwrap();

    let output = ollie(store.path(), &["save", "nosuchmodel:7b"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read manifest"), "stderr: {stderr}");
}

#[test]
fn test_save_invalid_name_fails() {
    let store = TempDir::new().unwrap();

    let output = ollie(store.path(), &["save", "llama2:"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid model name format"), "stderr: {stderr}");
}

#[test]
fn test_load_unsupported_format_fails() {
    let work = TempDir::new().unwrap();
    let target = work.path().join("models");
    let archive = work.path().join("tinyllama.zip");
    fs::write(&archive, b"PK\x03\x04").unwrap();

    let output = ollie(&target, &["load", archive.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported file extension"), "stderr: {stderr}");
    assert!(!target.exists());
}
