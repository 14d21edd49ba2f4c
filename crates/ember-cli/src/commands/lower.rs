//! `ember lower` — Lower instruction streams to target text.

use anyhow::Context;
use ember_jit::stream::header_name;
use std::path::Path;

pub fn execute(file: &Path, config: Option<&Path>) -> anyhow::Result<String> {
    let value = super::read_json(file)?;
    let mut compiler = super::compiler(config)?;

    let mut lowered = Vec::new();
    for (index, stream) in super::streams(&value)?.into_iter().enumerate() {
        let name = header_name(stream).unwrap_or("<unnamed>").to_string();
        let code = compiler
            .lower_json(stream)
            .with_context(|| format!("failed to lower stream {} ({})", index, name))?;
        lowered.push(code);
    }

    log::info!("[lower] {} stream(s) from {}", lowered.len(), file.display());
    Ok(lowered.join("\n\n"))
}
