//! Line item model.
//!
//! A line item is the mutable unit of work in the wizard. Every edit
//! constructs a new value through the `with_*` builders rather than
//! patching fields in place; any edit that touches an input of the
//! pricing formula clears the derived fields, so a stale rate or tax
//! amount can never be read as authoritative.

use serde::{Deserialize, Serialize};

use crate::engine::reconciler::Pricing;
use crate::engine::resolver::Resolution;

/// Linkage between a line item and the product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum CatalogLink {
    /// Not linked yet: a new or unknown product.
    #[default]
    Unset,
    /// Backed by a real catalog item.
    Item(String),
    /// Generated system charge (delivery, COD fee). Exempt from tax
    /// auto-correction and from catalog creation.
    System,
}

/// Wire value reserved for system charge lines.
const SYSTEM_REF: &str = "system";

impl From<Option<String>> for CatalogLink {
    fn from(value: Option<String>) -> Self {
        match value {
            None => CatalogLink::Unset,
            Some(s) if s.is_empty() => CatalogLink::Unset,
            Some(s) if s == SYSTEM_REF => CatalogLink::System,
            Some(s) => CatalogLink::Item(s),
        }
    }
}

impl From<CatalogLink> for Option<String> {
    fn from(value: CatalogLink) -> Self {
        match value {
            CatalogLink::Unset => None,
            CatalogLink::Item(id) => Some(id),
            CatalogLink::System => Some(SYSTEM_REF.to_string()),
        }
    }
}

/// A single wizard line item.
///
/// The derived fields (`unit_rate`, `tax_amount`, `item_total`) are a
/// pure function of quantity, final price and the selected tax's
/// percentage at the moment of the last reconciliation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    /// HSN/SAC classification code. Absence disables auto-correction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsn_sac: Option<String>,

    /// Product catalog linkage.
    #[serde(skip_serializing_if = "CatalogLink::is_unset")]
    pub item_ref: CatalogLink,

    /// Product/service description.
    pub description: String,

    /// Quantity (>= 0).
    pub quantity: f64,

    /// User-entered tax-inclusive unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,

    /// Selected tax id, or the "no tax" sentinel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,

    /// Derived: pre-tax unit rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_rate: Option<f64>,

    /// Derived: tax amount for the whole line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<f64>,

    /// Derived: pre-tax line total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_total: Option<f64>,

    /// Set when the resolver changed the tax selection.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tax_auto_corrected: bool,

    /// Explanation shown next to an auto-corrected line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_correction_note: Option<String>,
}

impl CatalogLink {
    fn is_unset(&self) -> bool {
        matches!(self, CatalogLink::Unset)
    }
}

impl LineItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_hsn_sac(mut self, code: impl Into<String>) -> Self {
        self.hsn_sac = Some(code.into());
        self
    }

    pub fn with_item_ref(mut self, link: CatalogLink) -> Self {
        self.item_ref = link;
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self.clear_derived();
        self
    }

    pub fn with_final_price(mut self, price: f64) -> Self {
        self.final_price = Some(price);
        self.clear_derived();
        self
    }

    pub fn with_tax(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = Some(tax_id.into());
        self.clear_derived();
        self
    }

    /// True for generated system charge lines.
    pub fn is_system_charge(&self) -> bool {
        self.item_ref == CatalogLink::System
    }

    /// True once any tax id (including the sentinel) has been selected.
    pub fn has_tax_selected(&self) -> bool {
        self.tax_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Apply a resolver decision, keeping the correction flags in sync.
    /// A changed selection invalidates the derived pricing fields.
    pub fn with_resolution(mut self, resolution: &Resolution) -> Self {
        if self.tax_id != resolution.tax_id {
            self.tax_id = resolution.tax_id.clone();
            self.clear_derived();
        }
        self.tax_auto_corrected = resolution.auto_corrected;
        self.tax_correction_note = resolution.note.clone();
        self
    }

    /// Store reconciled pricing on the line.
    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.unit_rate = Some(pricing.unit_rate);
        self.tax_amount = Some(pricing.tax_amount);
        self.item_total = Some(pricing.subtotal);
        self
    }

    fn clear_derived(&mut self) {
        self.unit_rate = None;
        self.tax_amount = None;
        self.item_total = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_clear_derived_fields() {
        let line = LineItem::new()
            .with_description("Brass statuette")
            .with_final_price(118.0)
            .with_quantity(1.0)
            .with_pricing(Pricing {
                unit_rate: 100.0,
                unit_tax: 18.0,
                tax_amount: 18.0,
                subtotal: 100.0,
            });
        assert_eq!(line.unit_rate, Some(100.0));

        let line = line.with_quantity(2.0);
        assert_eq!(line.unit_rate, None);
        assert_eq!(line.tax_amount, None);
        assert_eq!(line.item_total, None);
    }

    #[test]
    fn catalog_link_round_trips_through_wire_form() {
        let json = serde_json::to_string(&CatalogLink::System).unwrap();
        assert_eq!(json, r#""system""#);

        let link: CatalogLink = serde_json::from_str(r#""item-42""#).unwrap();
        assert_eq!(link, CatalogLink::Item("item-42".to_string()));

        let link: CatalogLink = serde_json::from_str("null").unwrap();
        assert_eq!(link, CatalogLink::Unset);
    }

    #[test]
    fn unset_link_is_omitted_from_serialized_lines() {
        let line = LineItem::new().with_description("x");
        let json = serde_json::to_value(&line).unwrap();
        assert!(json.get("item_ref").is_none());

        let line = line.with_item_ref(CatalogLink::System);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["item_ref"], "system");
    }

    #[test]
    fn empty_tax_id_counts_as_unselected() {
        let mut line = LineItem::new();
        assert!(!line.has_tax_selected());
        line.tax_id = Some(String::new());
        assert!(!line.has_tax_selected());
        let line = line.with_tax("GST18");
        assert!(line.has_tax_selected());
    }
}
