//! Tax selection resolution for line items.
//!
//! The resolver decides which tax id a line should carry given its
//! classification code and the order's interstate status, and explains
//! any correction it makes. It is total: when it cannot decide safely
//! it returns the current selection unchanged instead of guessing.

use serde::Serialize;
use tracing::debug;

use crate::engine::matcher::{RATE_TOLERANCE, find_tax_for_rate};
use crate::engine::rates::RateTable;
use crate::engine::reconciler::reconcile_line;
use crate::models::line_item::{CatalogLink, LineItem};
use crate::models::order::OrderContext;
use crate::models::tax::{NO_TAX_ID, TaxCatalog, TaxFamily, TaxRecord, is_no_tax};

/// Note attached when a line is forced to the zero-rate sentinel.
pub const ZERO_RATE_NOTE: &str = "Converted to 0% tax for this HSN.";

/// Note attached when an intrastate order had an IGST selection.
pub const TO_INTRASTATE_NOTE: &str =
    "Tax changed from IGST to CGST/SGST because this is an intrastate order.";

/// Note attached when an interstate order had a CGST/SGST selection.
pub const TO_INTERSTATE_NOTE: &str =
    "Tax changed from CGST/SGST to IGST because this is an interstate order.";

/// Outcome of resolving one line's tax selection.
///
/// `auto_corrected` marks a changed selection that replaced a wrong
/// one; silently filling a blank line does not set it. `note` is only
/// present when there is something to explain to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub tax_id: Option<String>,
    pub auto_corrected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Resolution {
    fn unchanged(line: &LineItem) -> Self {
        Self {
            tax_id: line.tax_id.clone(),
            auto_corrected: false,
            note: None,
        }
    }
}

/// Resolves tax selections against a rate table and the live catalog.
#[derive(Debug, Clone, Default)]
pub struct TaxResolver {
    table: RateTable,
}

impl TaxResolver {
    /// Resolver over the built-in rate table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver over a config-extended rate table.
    pub fn with_table(table: RateTable) -> Self {
        Self { table }
    }

    /// Decide the tax selection for one line.
    ///
    /// The caller applies the returned decision; the resolver itself
    /// never mutates the line.
    pub fn resolve(
        &self,
        line: &LineItem,
        ctx: &OrderContext,
        catalog: &TaxCatalog,
    ) -> Resolution {
        // Nothing to resolve against, or a generated charge line that
        // must keep whatever the system assigned it.
        if catalog.is_empty() || line.is_system_charge() {
            return Resolution::unchanged(line);
        }

        // No classification code: auto-correction is disabled for the
        // line. The validator still gets the final word on it.
        let Some(code) = line.hsn_sac.as_deref() else {
            return Resolution::unchanged(line);
        };

        let code_rate = self.table.rate_for(code);
        let current = line
            .tax_id
            .as_deref()
            .filter(|id| !is_no_tax(id))
            .and_then(|id| catalog.get(id));
        let on_no_tax = line.tax_id.as_deref().is_some_and(is_no_tax);

        // Unknown rate: the code is not in the table and the selection
        // does not resolve. Leave the line alone.
        if code_rate.is_none() && current.is_none() {
            return Resolution::unchanged(line);
        }

        // Zero-rated by classification or by the selected tax: force
        // the sentinel rather than hunting for a zero-percent record.
        let zero_rated = code_rate.is_some_and(|r| r == 0.0)
            || current.is_some_and(|t| t.percent == 0.0);
        if zero_rated {
            return Resolution {
                tax_id: Some(NO_TAX_ID.to_string()),
                auto_corrected: !on_no_tax,
                note: (!on_no_tax).then(|| ZERO_RATE_NOTE.to_string()),
            };
        }

        // Effective rate: prefer the live percentage of the current
        // selection so a deliberate rate override survives; fall back
        // to the classification rate.
        let rate = match current.map(|t| t.percent).or(code_rate) {
            Some(rate) => rate,
            None => return Resolution::unchanged(line),
        };

        let family = if ctx.is_interstate() {
            TaxFamily::Interstate
        } else {
            TaxFamily::Intrastate
        };

        let Some(preferred) = self.preferred_record(code, rate, family, catalog) else {
            // The catalog has no record for this rate and family.
            // Never invent an id.
            return Resolution::unchanged(line);
        };

        // A brand-new line with a code but no selection yet: filling a
        // blank, not correcting a mistake.
        if !line.has_tax_selected() && line.item_ref == CatalogLink::Unset {
            return Resolution {
                tax_id: Some(preferred.id.clone()),
                auto_corrected: false,
                note: None,
            };
        }

        let needs_switch = match current {
            None => true,
            Some(cur) => {
                (cur.percent - preferred.percent).abs() >= RATE_TOLERANCE
                    || cur.family != preferred.family
            }
        };
        if !needs_switch {
            return Resolution::unchanged(line);
        }

        // Explain the correction only for a real family flip; an id
        // switch at the same family gets no note.
        let note = match current {
            Some(cur) if cur.family != preferred.family => Some(
                match preferred.family {
                    TaxFamily::Interstate => TO_INTERSTATE_NOTE,
                    TaxFamily::Intrastate => TO_INTRASTATE_NOTE,
                }
                .to_string(),
            ),
            _ => None,
        };

        debug!(
            tax_id = %preferred.id,
            percent = preferred.percent,
            "auto-corrected tax selection"
        );

        Resolution {
            tax_id: Some(preferred.id.clone()),
            auto_corrected: true,
            note,
        }
    }

    /// Re-resolve and re-price every line of an order. Run when the
    /// interstate status flips or when the catalog first loads; each
    /// line is independent, so the pass is order-insensitive.
    pub fn revise_order(
        &self,
        lines: &[LineItem],
        ctx: &OrderContext,
        catalog: &TaxCatalog,
    ) -> Vec<LineItem> {
        debug!(
            lines = lines.len(),
            interstate = ctx.is_interstate(),
            "revising order lines"
        );
        lines
            .iter()
            .map(|line| {
                let resolution = self.resolve(line, ctx, catalog);
                let line = line.clone().with_resolution(&resolution);
                let pricing = reconcile_line(&line, catalog);
                line.with_pricing(pricing)
            })
            .collect()
    }

    /// Preferred record for a rate and family: pinned ids first, then
    /// a catalog search.
    fn preferred_record<'a>(
        &self,
        code: &str,
        rate: f64,
        family: TaxFamily,
        catalog: &'a TaxCatalog,
    ) -> Option<&'a TaxRecord> {
        if let Some(pinned) = self.table.pinned_for(code) {
            let id = match family {
                TaxFamily::Interstate => &pinned.interstate,
                TaxFamily::Intrastate => &pinned.intrastate,
            };
            if let Some(tax) = catalog.get(id) {
                return Some(tax);
            }
        }
        find_tax_for_rate(catalog, rate, family)
    }
}
