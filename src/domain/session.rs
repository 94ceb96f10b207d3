use crate::domain::provider::PaymentData;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Session property recording whether exactly one payment method was active
/// when the skip decision was made.
pub const HAS_ONLY_ONE_ACTIVE_METHOD: &str = "HasOnlyOneActivePaymentMethod";

/// Mutable per-checkout state for the payment step.
///
/// One instance lives for the duration of a checkout session and is
/// destroyed when the checkout completes or expires. The payment step and
/// its sibling requirement steps are the only writers.
///
/// Invariant: `selection_skipped` is only true when no payment is required,
/// when a single eligible method needed no explicit selection, or when quick
/// checkout resolved a method.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
    pub payment_required: bool,
    pub selection_skipped: bool,
    pub payment_summary: Option<String>,
    /// Last submitted raw form fields, echoed back so the user does not
    /// re-enter data after a failure elsewhere in the checkout.
    pub form_echo: BTreeMap<String, String>,
    pub payment_data: Option<PaymentData>,
    properties: HashMap<String, Value>,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cross-cutting extension property.
    pub fn set_property(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}
