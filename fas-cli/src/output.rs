use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;

/// Render a response for stdout: two-space pretty JSON, or a single line with `raw`.
pub fn render(value: &Value, raw: bool) -> Result<String> {
    let text = if raw {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    text.context("Failed to serialize response")
}

pub fn print_json<W: Write>(out: &mut W, value: &Value, raw: bool) -> Result<()> {
    let text = render(value, raw)?;
    writeln!(out, "{}", text).context("Failed to write output")
}
