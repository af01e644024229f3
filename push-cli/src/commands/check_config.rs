//! Validate a bridge config file.

use anyhow::{Context, Result};
use push_bridge::BridgeConfig;
use std::path::Path;

/// Run the check-config command.
pub fn run(path: &Path) -> Result<()> {
    let config = BridgeConfig::from_file(path)
        .with_context(|| format!("Config {} is not valid", path.display()))?;

    println!("# {} is valid; effective settings:", path.display());
    println!("{}", render(&config)?);
    Ok(())
}

/// The config with every default filled in, as TOML.
pub fn render(config: &BridgeConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to render config")
}
