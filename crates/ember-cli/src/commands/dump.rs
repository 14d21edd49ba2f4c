//! `ember dump` — Print decoded streams in the debug vertex notation.

use anyhow::Context;
use ember_jit::stream::decode;
use std::fmt::Write;
use std::path::Path;

pub fn execute(file: &Path) -> anyhow::Result<String> {
    let value = super::read_json(file)?;

    let mut out = String::new();
    for (index, item) in super::streams(&value)?.into_iter().enumerate() {
        let stream = decode(item).with_context(|| format!("failed to decode stream {}", index))?;
        if index > 0 {
            out.push('\n');
        }
        let params: Vec<String> = stream.params().iter().map(|p| p.to_string()).collect();
        writeln!(out, "{} {}({})", stream.header.kind.tag(), stream.name(), params.join(", "))?;
        for vertex in &stream.body {
            writeln!(out, "  {}", vertex)?;
        }
    }
    Ok(out.trim_end().to_string())
}
