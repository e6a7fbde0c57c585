//! WASM bindings for the GST tax engine.
//!
//! The browser wizard loads the provider tax catalog once per session
//! and re-runs resolution and pricing on every relevant keystroke, so
//! the whole engine is exposed as a stateful `TaxWizard` class plus a
//! few stateless helpers.

use wasm_bindgen::prelude::*;

use taxline_core::models::codes;
use taxline_core::{
    LineItem, OrderContext, ProviderTaxList, RateTable, TaxCatalog, TaxResolver, format_inr,
    reconcile, reconcile_line, round_currency, validate_order,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Whether an order to `destination` is interstate for a business
/// registered in `home_state`.
#[wasm_bindgen]
pub fn is_interstate(home_state: &str, destination: Option<String>) -> bool {
    OrderContext::new(home_state, destination).is_interstate()
}

/// Whether a classification code has a recognizable HSN or SAC shape.
#[wasm_bindgen]
pub fn is_valid_code(code: &str) -> bool {
    codes::is_valid(code)
}

/// Round to 2-decimal currency precision for display.
#[wasm_bindgen]
pub fn round_amount(value: f64) -> f64 {
    round_currency(value)
}

/// Format an amount with Indian digit grouping (12,34,567.89).
#[wasm_bindgen]
pub fn format_amount(value: f64) -> String {
    format_inr(value)
}

/// Back-compute pricing for one line from its tax-inclusive price.
#[wasm_bindgen]
pub fn price_line(final_price: f64, quantity: f64, percent: f64) -> Result<JsValue, JsValue> {
    let pricing = reconcile(final_price, quantity, percent);
    serde_wasm_bindgen::to_value(&pricing).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Session-scoped engine state for the browser wizard.
#[wasm_bindgen]
pub struct TaxWizard {
    resolver: TaxResolver,
    catalog: TaxCatalog,
    home_state: String,
    destination: Option<String>,
}

#[wasm_bindgen]
impl TaxWizard {
    /// Create a wizard for a business registered in `home_state`.
    #[wasm_bindgen(constructor)]
    pub fn new(home_state: &str) -> Self {
        Self {
            resolver: TaxResolver::new(),
            catalog: TaxCatalog::default(),
            home_state: home_state.to_string(),
            destination: None,
        }
    }

    /// Load the provider tax list document fetched by the host page.
    /// Until this runs, resolution is a deliberate no-op.
    #[wasm_bindgen]
    pub fn load_catalog(&mut self, taxes: JsValue) -> Result<usize, JsValue> {
        let list: ProviderTaxList =
            serde_wasm_bindgen::from_value(taxes).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.catalog = TaxCatalog::from_provider(list);
        Ok(self.catalog.len())
    }

    /// Extend the built-in rate table from an `EngineConfig` rates
    /// section.
    #[wasm_bindgen]
    pub fn load_rates(&mut self, rates: JsValue) -> Result<(), JsValue> {
        let rates = serde_wasm_bindgen::from_value(rates)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.resolver = TaxResolver::with_table(RateTable::with_config(&rates));
        Ok(())
    }

    /// Update the destination state from the shipping address step.
    #[wasm_bindgen]
    pub fn set_destination(&mut self, destination: Option<String>) {
        self.destination = destination;
    }

    /// Whether the current destination makes the order interstate.
    #[wasm_bindgen]
    pub fn interstate(&self) -> bool {
        self.context().is_interstate()
    }

    /// Resolve the tax selection for one line without mutating it.
    #[wasm_bindgen]
    pub fn resolve_line(&self, line: JsValue) -> Result<JsValue, JsValue> {
        let line: LineItem =
            serde_wasm_bindgen::from_value(line).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let resolution = self.resolver.resolve(&line, &self.context(), &self.catalog);
        serde_wasm_bindgen::to_value(&resolution).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Re-resolve and re-price every line. Call after the destination
    /// flips or the catalog loads.
    #[wasm_bindgen]
    pub fn revise_order(&self, lines: JsValue) -> Result<JsValue, JsValue> {
        let lines: Vec<LineItem> =
            serde_wasm_bindgen::from_value(lines).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let revised = self
            .resolver
            .revise_order(&lines, &self.context(), &self.catalog);
        serde_wasm_bindgen::to_value(&revised).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Price one line against the loaded catalog.
    #[wasm_bindgen]
    pub fn price(&self, line: JsValue) -> Result<JsValue, JsValue> {
        let line: LineItem =
            serde_wasm_bindgen::from_value(line).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let pricing = reconcile_line(&line, &self.catalog);
        serde_wasm_bindgen::to_value(&pricing).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Validate the full line set before submission. Returns the list
    /// of blocking issues; an empty list means the order may go out.
    #[wasm_bindgen]
    pub fn validate(&self, lines: JsValue) -> Result<JsValue, JsValue> {
        let lines: Vec<LineItem> =
            serde_wasm_bindgen::from_value(lines).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let issues = validate_order(&lines, &self.catalog, self.context().is_interstate());
        serde_wasm_bindgen::to_value(&issues).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn context(&self) -> OrderContext {
        OrderContext::new(self.home_state.as_str(), self.destination.clone())
    }
}
