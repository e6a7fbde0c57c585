//! Tax-inclusive price back-calculation.
//!
//! Users enter the price a customer actually pays; the pre-tax rate
//! and tax amount are derived from it. All arithmetic stays in `f64`
//! with no intermediate rounding; currency rounding exists only as
//! explicit display/submission helpers so repeated recalculation never
//! compounds rounding error.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::line_item::LineItem;
use crate::models::tax::{TaxCatalog, is_no_tax};

/// Derived pricing for one line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pricing {
    /// Pre-tax unit rate.
    pub unit_rate: f64,
    /// Tax amount per unit.
    pub unit_tax: f64,
    /// Tax amount for the whole line.
    pub tax_amount: f64,
    /// Pre-tax line total.
    pub subtotal: f64,
}

/// Back-compute pricing from a tax-inclusive unit price.
pub fn reconcile(final_price: f64, quantity: f64, percent: f64) -> Pricing {
    let unit_rate = if percent == 0.0 {
        final_price
    } else {
        final_price / (1.0 + percent / 100.0)
    };
    let unit_tax = final_price - unit_rate;
    Pricing {
        unit_rate,
        unit_tax,
        tax_amount: unit_tax * quantity,
        subtotal: unit_rate * quantity,
    }
}

/// Reconcile a line against the loaded catalog. The "no tax" sentinel
/// and an unresolvable selection both price at 0%.
pub fn reconcile_line(line: &LineItem, catalog: &TaxCatalog) -> Pricing {
    let percent = line
        .tax_id
        .as_deref()
        .filter(|id| !is_no_tax(id))
        .and_then(|id| catalog.percent_of(id))
        .unwrap_or(0.0);
    reconcile(line.final_price.unwrap_or(0.0), line.quantity, percent)
}

/// Round to 2-decimal currency precision, half away from zero.
/// Display/submission only; never fed back into the formula.
pub fn round_currency(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Format an amount with Indian digit grouping (12,34,567.89).
pub fn format_inr(value: f64) -> String {
    let rounded = Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or_default();
    let s = format!("{:.2}", rounded);
    let (sign, s) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", &s[..]),
    };
    let (int_part, dec_part) = s.split_once('.').unwrap_or((s, "00"));

    // Last three digits, then groups of two.
    let mut groups: Vec<String> = Vec::new();
    let digits: Vec<char> = int_part.chars().collect();
    let head = digits.len().saturating_sub(3);
    groups.push(digits[head..].iter().collect());
    let mut rest = &digits[..head];
    while !rest.is_empty() {
        let cut = rest.len().saturating_sub(2);
        groups.push(rest[cut..].iter().collect());
        rest = &rest[..cut];
    }
    groups.reverse();

    format!("{}{}.{}", sign, groups.join(","), dec_part)
}
