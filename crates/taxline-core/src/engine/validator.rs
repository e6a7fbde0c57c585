//! Pre-submission order validation.
//!
//! The last line of defense: a batch re-check of every line's tax
//! family against the order's interstate status. Runs after the
//! resolver has had its chance, so anything flagged here blocks
//! submission instead of being silently fixed.

use serde::Serialize;
use tracing::debug;

use crate::engine::matcher::find_tax_for_rate;
use crate::models::line_item::LineItem;
use crate::models::tax::{TaxCatalog, TaxFamily, is_no_tax};

/// Shown when an intrastate order carries an IGST line.
pub const IGST_INTRASTATE_MSG: &str =
    "IGST cannot be applied as this is an intrastate transaction.";

/// Shown when an interstate order carries a CGST/SGST line and the
/// catalog offers an IGST equivalent.
pub const GST_INTERSTATE_MSG: &str =
    "For interstate orders, IGST should be applied instead of CGST/SGST for this rate.";

/// One blocking problem on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Zero-based index of the offending line.
    pub index: usize,
    pub message: String,
}

/// Check every line's tax family against the order's interstate
/// status. An empty result means the order may be submitted.
///
/// The two rules are asymmetric: IGST on an intrastate order is
/// always wrong, while CGST/SGST on an interstate order is only
/// flagged when the catalog actually offers an IGST record at the
/// same rate.
pub fn validate_order(
    lines: &[LineItem],
    catalog: &TaxCatalog,
    is_interstate: bool,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let Some(tax) = line
            .tax_id
            .as_deref()
            .filter(|id| !is_no_tax(id))
            .and_then(|id| catalog.get(id))
        else {
            continue;
        };
        if tax.percent <= 0.0 {
            continue;
        }

        match (is_interstate, tax.family) {
            (false, TaxFamily::Interstate) => {
                issues.push(ValidationIssue {
                    index,
                    message: IGST_INTRASTATE_MSG.to_string(),
                });
            }
            (true, TaxFamily::Intrastate) => {
                if find_tax_for_rate(catalog, tax.percent, TaxFamily::Interstate).is_some() {
                    issues.push(ValidationIssue {
                        index,
                        message: GST_INTERSTATE_MSG.to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    debug!(issues = issues.len(), "validated order lines");
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tax::{NO_TAX_ID, ProviderTax, ProviderTaxList};

    fn provider(id: &str, name: &str, pct: f64) -> ProviderTax {
        ProviderTax {
            tax_id: id.to_string(),
            tax_name: name.to_string(),
            tax_percentage: pct,
            tax_type: "tax".to_string(),
        }
    }

    fn full_catalog() -> TaxCatalog {
        TaxCatalog::from_provider(ProviderTaxList {
            taxes: vec![
                provider("GST18", "GST 18 (9 + 9)", 18.0),
                provider("IGST18", "IGST 18", 18.0),
            ],
        })
    }

    fn line_with_tax(tax_id: &str) -> LineItem {
        LineItem::new().with_tax(tax_id)
    }

    #[test]
    fn matched_families_pass() {
        let catalog = full_catalog();
        let igst_lines = vec![line_with_tax("IGST18"), line_with_tax("IGST18")];
        assert!(validate_order(&igst_lines, &catalog, true).is_empty());

        let gst_lines = vec![line_with_tax("GST18")];
        assert!(validate_order(&gst_lines, &catalog, false).is_empty());
    }

    #[test]
    fn igst_on_intrastate_is_always_flagged() {
        // Even without a CGST/SGST equivalent in the catalog.
        let igst_only = TaxCatalog::from_provider(ProviderTaxList {
            taxes: vec![provider("IGST18", "IGST 18", 18.0)],
        });
        let lines = vec![line_with_tax("IGST18")];

        let issues = validate_order(&lines, &igst_only, false);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].index, 0);
        assert_eq!(issues[0].message, IGST_INTRASTATE_MSG);
    }

    #[test]
    fn gst_on_interstate_needs_an_igst_equivalent_to_flag() {
        // No IGST record at 18%: the catalog lacks the right option,
        // which is not the line's fault.
        let gst_only = TaxCatalog::from_provider(ProviderTaxList {
            taxes: vec![provider("GST18", "GST 18", 18.0)],
        });
        let lines = vec![line_with_tax("GST18")];
        assert!(validate_order(&lines, &gst_only, true).is_empty());

        // With the equivalent present, the same line is flagged.
        let issues = validate_order(&lines, &full_catalog(), true);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, GST_INTERSTATE_MSG);
    }

    #[test]
    fn untaxed_lines_are_skipped() {
        let catalog = full_catalog();
        let lines = vec![
            LineItem::new(),
            line_with_tax(NO_TAX_ID),
            line_with_tax(""),
            line_with_tax("UNKNOWN"),
        ];
        assert!(validate_order(&lines, &catalog, false).is_empty());
    }

    #[test]
    fn issues_carry_line_indexes() {
        let catalog = full_catalog();
        let lines = vec![
            line_with_tax("GST18"),
            line_with_tax("IGST18"),
            line_with_tax("IGST18"),
        ];
        let issues = validate_order(&lines, &catalog, false);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].index, 1);
        assert_eq!(issues[1].index, 2);
    }
}
