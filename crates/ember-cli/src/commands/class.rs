//! `ember class` — Convert a class descriptor.

use anyhow::Context;
use ember_jit::ClassDescriptor;
use std::path::Path;

pub fn execute(file: &Path, config: Option<&Path>) -> anyhow::Result<String> {
    let value = super::read_json(file)?;
    let class = ClassDescriptor::from_json(&value)
        .with_context(|| format!("invalid class descriptor in {}", file.display()))?;

    let mut compiler = super::compiler(config)?;
    let code = compiler
        .lower_class(&class)
        .with_context(|| format!("failed to convert class {}", class.name))?;
    Ok(code)
}
