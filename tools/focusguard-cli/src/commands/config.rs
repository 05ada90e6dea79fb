//! Inspect and manage the configuration file.

use std::path::{Path, PathBuf};

use focusguard_common::config::{config_file_path, AppConfig};

/// Load the configuration a command runs with. An explicit path must exist;
/// the default location falls back to defaults only when no file is there.
pub fn load(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display())),
        None => AppConfig::load().map_err(|e| {
            anyhow::anyhow!("Failed to load config {}: {e}", config_file_path().display())
        }),
    }
}

pub fn init(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(config_file_path);
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    AppConfig::default()
        .save_to(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;
    println!("Wrote default config to: {}", path.display());
    Ok(())
}

pub fn show(path: Option<&Path>) -> anyhow::Result<()> {
    let config = load(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub fn validate(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(config_file_path);
    println!("Validating config at: {}", path.display());

    let config =
        AppConfig::load_from(&path).map_err(|e| anyhow::anyhow!("Invalid config: {e}"))?;

    let engine = &config.engine;
    println!("  Smoothing: {} samples, ratio {}", engine.buffer_size, engine.smoothing_ratio);
    println!("  Cooldown: {}s", engine.cooldown_seconds);
    println!("  Praise interval: {}s", engine.praise_interval_seconds);
    match engine.iris_bounds() {
        Some((low, high)) => println!("  Gaze checks: iris offset within [{low}, {high}]"),
        None => println!("  Gaze checks: off"),
    }
    println!("\nConfig is valid.");
    Ok(())
}
