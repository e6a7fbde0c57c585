//! Tax family matching against the live catalog.

use crate::models::tax::{TaxCatalog, TaxFamily, TaxRecord};

/// Tolerance when comparing percentages from different sources.
pub const RATE_TOLERANCE: f64 = 0.01;

/// True when two percentages agree within [`RATE_TOLERANCE`].
pub fn rates_match(a: f64, b: f64) -> bool {
    (a - b).abs() < RATE_TOLERANCE
}

/// Find the first catalog record at the desired percentage and family.
///
/// Family is ignored for an exactly-zero percentage: any zero-rate
/// record is acceptable there. Returns `None` rather than a
/// wrong-family match when nothing fits.
pub fn find_tax_for_rate(
    catalog: &TaxCatalog,
    percent: f64,
    family: TaxFamily,
) -> Option<&TaxRecord> {
    catalog
        .records()
        .iter()
        .find(|t| rates_match(t.percent, percent) && (percent == 0.0 || t.family == family))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tax::{ProviderTax, ProviderTaxList};

    fn catalog() -> TaxCatalog {
        TaxCatalog::from_provider(ProviderTaxList {
            taxes: vec![
                ProviderTax {
                    tax_id: "GST18".to_string(),
                    tax_name: "GST 18 (9 + 9)".to_string(),
                    tax_percentage: 18.0,
                    tax_type: "tax_group".to_string(),
                },
                ProviderTax {
                    tax_id: "IGST18".to_string(),
                    tax_name: "IGST 18".to_string(),
                    tax_percentage: 18.0,
                    tax_type: "tax".to_string(),
                },
                ProviderTax {
                    tax_id: "EXEMPT".to_string(),
                    tax_name: "GST 0".to_string(),
                    tax_percentage: 0.0,
                    tax_type: "tax".to_string(),
                },
            ],
        })
    }

    #[test]
    fn picks_record_matching_family() {
        let catalog = catalog();
        let tax = find_tax_for_rate(&catalog, 18.0, TaxFamily::Interstate).unwrap();
        assert_eq!(tax.id, "IGST18");
        let tax = find_tax_for_rate(&catalog, 18.0, TaxFamily::Intrastate).unwrap();
        assert_eq!(tax.id, "GST18");
    }

    #[test]
    fn zero_rate_ignores_family() {
        let catalog = catalog();
        let tax = find_tax_for_rate(&catalog, 0.0, TaxFamily::Interstate).unwrap();
        assert_eq!(tax.id, "EXEMPT");
    }

    #[test]
    fn no_match_instead_of_wrong_family() {
        let catalog = TaxCatalog::from_provider(ProviderTaxList {
            taxes: vec![ProviderTax {
                tax_id: "GST18".to_string(),
                tax_name: "GST 18".to_string(),
                tax_percentage: 18.0,
                tax_type: "tax_group".to_string(),
            }],
        });
        assert!(find_tax_for_rate(&catalog, 18.0, TaxFamily::Interstate).is_none());
        assert!(find_tax_for_rate(&catalog, 12.0, TaxFamily::Intrastate).is_none());
    }

    #[test]
    fn tolerance_bounds() {
        let catalog = catalog();
        assert!(find_tax_for_rate(&catalog, 18.005, TaxFamily::Interstate).is_some());
        assert!(find_tax_for_rate(&catalog, 18.01, TaxFamily::Interstate).is_none());
    }
}
