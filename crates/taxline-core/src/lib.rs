//! Core library for GST tax normalization and price resolution.
//!
//! This crate provides:
//! - Classification (HSN/SAC) rate tables with config-supplied extensions
//! - Tax family matching against a live billing-provider catalog
//! - Auto-correction of interstate/intrastate tax selections
//! - Tax-inclusive price back-calculation
//! - Pre-submission order validation

pub mod engine;
pub mod error;
pub mod models;

pub use engine::matcher::{RATE_TOLERANCE, find_tax_for_rate};
pub use engine::rates::RateTable;
pub use engine::reconciler::{Pricing, format_inr, reconcile, reconcile_line, round_currency};
pub use engine::resolver::{Resolution, TaxResolver};
pub use engine::validator::{ValidationIssue, validate_order};
pub use error::{Result, TaxlineError};
pub use models::config::EngineConfig;
pub use models::line_item::{CatalogLink, LineItem};
pub use models::order::{OrderContext, OrderDraft};
pub use models::tax::{
    NO_TAX_ID, ProviderTax, ProviderTaxList, TaxCatalog, TaxFamily, TaxRecord, is_no_tax,
};
