// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading and validating
//! the configuration file.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load configuration from a TOML file.
///
/// A missing file means defaults. A file that exists but does not parse is
/// an error rather than a silent fallback.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::info!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let config = Config::load(path)?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Load and validate the configuration.
pub fn load_validated(path: &Path) -> Result<Config> {
    let config = load_config(path)?;
    config.validate().map_err(|e| {
        AppError::config(format!("Invalid configuration in {}: {e}", path.display()))
    })?;
    Ok(config)
}
