pub mod class;
pub mod dump;
pub mod lower;

use anyhow::Context;
use ember_jit::{Compiler, CompilerConfig};
use serde_json::Value;
use std::path::Path;

/// Read and parse a JSON input file
pub fn read_json(path: &Path) -> anyhow::Result<Value> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Build a compiler from an optional TOML config file
pub fn compiler(config: Option<&Path>) -> anyhow::Result<Compiler> {
    let config = match config {
        Some(path) => CompilerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CompilerConfig::default(),
    };
    log::debug!("[cli] compiler config: {:?}", config);
    Ok(Compiler::with_config(config))
}

/// Split a file into its streams: either one stream or a list of streams.
///
/// A single stream starts with its header tuple (`["function", ...]`); a list
/// starts with a whole stream (`[["function", ...], ...]`).
pub fn streams(value: &Value) -> anyhow::Result<Vec<&Value>> {
    let items = value
        .as_array()
        .context("input must be a JSON array")?;
    let is_list = items
        .first()
        .and_then(Value::as_array)
        .and_then(|first| first.first())
        .map_or(false, Value::is_array);
    Ok(if is_list { items.iter().collect() } else { vec![value] })
}
