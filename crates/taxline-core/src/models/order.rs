//! Order documents and the interstate/intrastate tax context.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::line_item::LineItem;
use super::states;

/// Inputs for the interstate decision on one order.
///
/// The home state comes from configuration; the destination state is
/// whatever the user typed or picked for the shipping address.
#[derive(Debug, Clone)]
pub struct OrderContext {
    home_state: String,
    destination_state: Option<String>,
}

impl OrderContext {
    pub fn new(home_state: impl Into<String>, destination_state: Option<String>) -> Self {
        Self {
            home_state: home_state.into(),
            destination_state,
        }
    }

    /// Whether the order ships across a state border.
    ///
    /// An empty or unrecognized destination resolves to interstate, the
    /// stricter case requiring IGST.
    pub fn is_interstate(&self) -> bool {
        let home = states::normalize(&self.home_state);
        let dest = self
            .destination_state
            .as_deref()
            .and_then(states::normalize);
        match (home, dest) {
            (Some(home), Some(dest)) => home != dest,
            _ => true,
        }
    }

    pub fn home_state(&self) -> &str {
        &self.home_state
    }

    pub fn destination_state(&self) -> Option<&str> {
        self.destination_state.as_deref()
    }
}

/// The order document the wizard builds and the CLI reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDraft {
    /// Human-facing order reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,

    /// Destination state name or code from the shipping address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_state: Option<String>,

    pub lines: Vec<LineItem>,
}

impl OrderDraft {
    /// Tax context for this order given the configured home state.
    pub fn context(&self, home_state: &str) -> OrderContext {
        OrderContext::new(home_state, self.destination_state.clone())
    }
}
