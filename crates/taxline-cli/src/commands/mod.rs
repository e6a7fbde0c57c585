//! CLI subcommands.

pub mod batch;
pub mod catalog;
pub mod check;
pub mod config;

use std::path::{Path, PathBuf};

use taxline_core::{EngineConfig, TaxCatalog};

/// Default directory for the config file and the cached catalog.
pub fn data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taxline")
}

/// Load configuration from an explicit path, the default location, or
/// fall back to defaults when no file exists yet.
pub fn load_config(path: Option<&str>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(p) => Ok(EngineConfig::from_file(Path::new(p))?),
        None => {
            let default = data_dir().join("config.json");
            if default.exists() {
                Ok(EngineConfig::from_file(&default)?)
            } else {
                Ok(EngineConfig::default())
            }
        }
    }
}

/// Load a cached provider tax list document and classify it.
pub fn load_catalog(path: &Path) -> anyhow::Result<TaxCatalog> {
    Ok(TaxCatalog::from_file(path)?)
}
