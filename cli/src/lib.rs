//! Ollie CLI - save and load Ollama models as tar archives.

pub mod commands;
