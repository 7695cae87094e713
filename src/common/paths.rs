use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the bookreel config directory, creating it when missing
pub fn bookreel_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("bookreel");

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating config directory at {}", config_dir.display()))?;

    Ok(config_dir)
}

pub fn config_file(name: &str) -> Result<PathBuf> {
    Ok(bookreel_config_dir()?.join(name))
}

/// Data directory used for installed shell completions
pub fn bookreel_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bookreel")
}
