//! Engine configuration.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxlineError};

/// Main configuration for the taxline engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Business registration details.
    pub business: BusinessConfig,

    /// Rate table extensions.
    pub rates: RatesConfig,

    /// Tax catalog source.
    pub catalog: CatalogConfig,
}

/// Registration details of the selling business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessConfig {
    /// Home state (GST registration state), name or alpha code.
    pub home_state: String,

    /// Display currency code.
    pub currency: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            home_state: "KA".to_string(),
            currency: "INR".to_string(),
        }
    }
}

/// Extensions merged over the built-in classification rate table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RatesConfig {
    /// Extra HSN/SAC -> percent entries. Entries here win over the
    /// built-in table when both carry the same code.
    pub extra: HashMap<String, f64>,

    /// Per-code pinned tax ids, taking precedence over searching the
    /// live catalog by percentage and family.
    pub pinned: HashMap<String, FamilyTaxIds>,
}

/// Explicit per-family tax identifiers for one classification code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyTaxIds {
    /// Tax id to apply on interstate orders (IGST family).
    pub interstate: String,
    /// Tax id to apply on intrastate orders (CGST/SGST family).
    pub intrastate: String,
}

/// Where the provider tax catalog is fetched from and cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Provider endpoint returning the tax list document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// File name of the cached catalog, relative to the config directory.
    pub cache_file: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            cache_file: "catalog.json".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TaxlineError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
