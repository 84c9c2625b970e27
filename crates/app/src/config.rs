//! Canvas configuration for the native harness

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scribble_config::CanvasConfig;
use tracing::info;

/// Environment variable naming a config file when `--config` is not given
pub const CONFIG_ENV: &str = "SCRIBBLE_CONFIG";

/// Config path from the command line, else from `SCRIBBLE_CONFIG`
pub fn config_path(cli: Option<&Path>) -> Option<PathBuf> {
    cli.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(CONFIG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

pub fn load_config(path: Option<&Path>) -> Result<CanvasConfig> {
    let Some(path) = path else {
        return Ok(CanvasConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = CanvasConfig::from_json(&json)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    info!(
        "Loaded config {}: {}x{} grid, {} classes",
        path.display(),
        config.width,
        config.height,
        config.class_count()
    );
    Ok(config)
}
