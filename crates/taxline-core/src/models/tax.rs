//! Tax catalog models.
//!
//! The billing provider exposes a flat list of tax options. Each option
//! belongs to one of two GST families: IGST for interstate transactions,
//! or a grouped CGST+SGST record for intrastate ones. The family is
//! stamped on every record in a single pass when the catalog is loaded,
//! so comparison sites never have to sniff display names again.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxlineError};

/// Sentinel tax id meaning "no tax applied".
///
/// Distinct from an unselected tax: a line carrying this id has been
/// deliberately zero-rated, while a line with no id at all has simply
/// not been resolved yet.
pub const NO_TAX_ID: &str = "NO_TAX";

/// True for the "no tax" sentinel and for the provider's empty-string
/// representation of it.
pub fn is_no_tax(tax_id: &str) -> bool {
    tax_id.is_empty() || tax_id == NO_TAX_ID
}

/// Which leg of the GST split a tax record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxFamily {
    /// IGST, applied to interstate transactions.
    Interstate,
    /// CGST+SGST pair, modeled by the provider as a single grouped record.
    Intrastate,
}

/// One tax row in the provider's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderTax {
    pub tax_id: String,
    pub tax_name: String,
    pub tax_percentage: f64,
    #[serde(default)]
    pub tax_type: String,
}

/// The provider's tax list document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderTaxList {
    #[serde(default)]
    pub taxes: Vec<ProviderTax>,
}

/// A tax option with its family resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRecord {
    pub id: String,
    pub name: String,
    pub percent: f64,
    pub tax_type: String,
    pub family: TaxFamily,
}

impl TaxRecord {
    /// Classify a provider row. IGST records are identified by their
    /// display name; everything else is treated as the intrastate pair.
    pub fn from_provider(raw: ProviderTax) -> Self {
        let family = if raw.tax_name.to_uppercase().contains("IGST") {
            TaxFamily::Interstate
        } else {
            TaxFamily::Intrastate
        };
        Self {
            id: raw.tax_id,
            name: raw.tax_name,
            percent: raw.tax_percentage,
            tax_type: raw.tax_type,
            family,
        }
    }
}

/// The loaded tax catalog for one wizard session.
#[derive(Debug, Clone, Default)]
pub struct TaxCatalog {
    records: Vec<TaxRecord>,
}

impl TaxCatalog {
    /// Build a catalog from the provider's tax list, classifying each
    /// record's family as it is loaded.
    pub fn from_provider(list: ProviderTaxList) -> Self {
        Self {
            records: list.taxes.into_iter().map(TaxRecord::from_provider).collect(),
        }
    }

    /// Build a catalog from already-classified records. Test seam.
    pub fn from_records(records: Vec<TaxRecord>) -> Self {
        Self { records }
    }

    /// Load a cached provider tax list document from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let list: ProviderTaxList = serde_json::from_str(&content)
            .map_err(|e| TaxlineError::Catalog(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_provider(list))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[TaxRecord] {
        &self.records
    }

    /// Look up a record by id. The "no tax" sentinel is not a record.
    pub fn get(&self, tax_id: &str) -> Option<&TaxRecord> {
        self.records.iter().find(|t| t.id == tax_id)
    }

    /// Live percentage of a catalog record, if the id resolves.
    pub fn percent_of(&self, tax_id: &str) -> Option<f64> {
        self.get(tax_id).map(|t| t.percent)
    }
}
