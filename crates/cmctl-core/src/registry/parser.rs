//! TOML parser with helpful error messages

use super::schema::RegistryFile;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse registry.toml with detailed error messages
pub fn parse_registry_toml(path: &Path) -> Result<RegistryFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read registry file: {}", path.display()))?;

    parse_registry_toml_str(&content)
        .with_context(|| format!("Failed to parse registry file: {}", path.display()))
}

/// Parse registry.toml content from string
pub fn parse_registry_toml_str(content: &str) -> Result<RegistryFile> {
    let registry: RegistryFile =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    registry.validate()?;

    Ok(registry)
}

/// Attach the offending lines to a TOML error
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let error_msg = error.to_string();

    let line_hint = error
        .span()
        .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);

    if let Some(line_num) = line_hint {
        anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            get_line_context(content, line_num),
            error_msg
        )
    } else {
        anyhow::anyhow!("TOML parsing error: {}", error_msg)
    }
}

fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 2).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize the registry to a TOML string
pub fn to_toml(registry: &RegistryFile) -> Result<String> {
    toml::to_string_pretty(registry).with_context(|| "Failed to serialize registry to TOML")
}
