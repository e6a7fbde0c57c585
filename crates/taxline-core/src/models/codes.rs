//! HSN/SAC code shape checks.
//!
//! Goods carry HSN codes of 4, 6 or 8 digits; services carry 6-digit
//! SAC codes in the 99 chapter. The rate table accepts any string key,
//! so these checks exist to warn about malformed input, not to gate it.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HSN_CODE: Regex = Regex::new(r"^\d{4}(?:\d{2}){0,2}$").unwrap();
    static ref SAC_CODE: Regex = Regex::new(r"^99\d{4}$").unwrap();
}

/// Classification code kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    /// Goods classification (HSN).
    Hsn,
    /// Services classification (SAC).
    Sac,
}

/// Classify a code by shape. SAC wins for 99-chapter 6-digit codes.
pub fn classify(code: &str) -> Option<CodeKind> {
    let code = code.trim();
    if SAC_CODE.is_match(code) {
        Some(CodeKind::Sac)
    } else if HSN_CODE.is_match(code) {
        Some(CodeKind::Hsn)
    } else {
        None
    }
}

/// True when the code has a recognizable HSN or SAC shape.
pub fn is_valid(code: &str) -> bool {
    classify(code).is_some()
}
