//! TOML configuration file parsing

use super::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse a TOML parameter plan file
pub fn parse_toml_file(path: &Path) -> Result<PlanConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse a TOML parameter plan from a string
pub fn parse_toml_string(contents: &str) -> Result<PlanConfig> {
    let config: PlanConfig = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Render a parameter plan back to TOML
pub fn to_toml_string(plan: &PlanConfig) -> Result<String> {
    ::toml::to_string_pretty(plan).context("Failed to serialize TOML configuration")
}
