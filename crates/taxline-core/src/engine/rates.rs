//! Classification rate table.
//!
//! Maps HSN/SAC codes to their canonical GST percentage. A code absent
//! from the table yields no rate, and the resolver leaves such lines
//! untouched rather than guessing.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::models::config::{FamilyTaxIds, RatesConfig};

/// Built-in HSN/SAC -> percent entries for the product range.
const BUILTIN_RATES: &[(&str, f64)] = &[
    // Rough diamonds and precious stones
    ("7102", 0.25),
    ("71023910", 0.25),
    // Jewellery
    ("7113", 3.0),
    ("71131910", 3.0),
    ("71171910", 3.0),
    // Statuettes and decorative articles of base metal
    ("8306", 18.0),
    ("83062990", 18.0),
    // Vegetable materials, zero-rated
    ("14049070", 0.0),
    // Zero-rated services
    ("999591", 0.0),
];

lazy_static! {
    static ref BUILTIN: HashMap<&'static str, f64> = BUILTIN_RATES.iter().copied().collect();
}

/// Rate table with optional config-supplied extensions.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    extra: HashMap<String, f64>,
    pinned: HashMap<String, FamilyTaxIds>,
}

impl RateTable {
    /// The built-in table with no extensions.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Built-in table extended from configuration. Config entries win
    /// over built-ins for the same code.
    pub fn with_config(rates: &RatesConfig) -> Self {
        Self {
            extra: rates.extra.clone(),
            pinned: rates.pinned.clone(),
        }
    }

    /// Canonical percentage for a classification code, if known.
    pub fn rate_for(&self, code: &str) -> Option<f64> {
        let code = code.trim();
        self.extra
            .get(code)
            .copied()
            .or_else(|| BUILTIN.get(code).copied())
    }

    /// Explicit per-family tax ids pinned for a code, if any.
    pub fn pinned_for(&self, code: &str) -> Option<&FamilyTaxIds> {
        self.pinned.get(code.trim())
    }
}
