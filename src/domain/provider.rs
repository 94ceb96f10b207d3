use crate::domain::cart::ShoppingCart;
use crate::domain::order::Order;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// How a payment method handles recurring (subscription) carts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringSupport {
    NotSupported,
    Manual,
    Automatic,
}

/// One user-facing validation failure for a submitted form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A raw submitted payment form: field name to the list of raw values
/// received for it.
///
/// Checkbox fields arrive twice from the browser (the "true" value plus a
/// hidden fallback); [`FormData::echo`] collapses those back to `"true"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one raw value to a field, preserving duplicates.
    pub fn append(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(value.into());
    }

    /// The first raw value of a field, if any was submitted.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Flattens the raw value sets into the per-field strings kept on the
    /// checkout session. A field submitted as exactly two values with the
    /// first equal to `"true"` echoes as `"true"`; every other field echoes
    /// as its raw comma-joined form.
    pub fn echo(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|(field, values)| {
                let echoed = if values.len() == 2 && values[0] == "true" {
                    "true".to_string()
                } else {
                    values.join(",")
                };
                (field.clone(), echoed)
            })
            .collect()
    }
}

/// A provider-built payment payload.
///
/// Opaque to the requirement step: it is stored on the checkout session and
/// consumed later by order placement. Repeat-payment requests reuse the same
/// shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentData {
    pub method: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl PaymentData {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Capability surface shared by every payment method.
#[async_trait]
pub trait PaymentMethod: Send + Sync {
    /// Whether the user must explicitly pick and confirm this method.
    fn requires_selection(&self) -> bool;

    fn recurring_support(&self) -> RecurringSupport;

    /// Short human-readable description shown in the checkout summary.
    fn summary(&self) -> String;

    /// Validates a submitted payment form. An empty result means valid.
    async fn validate(&self, form: &FormData) -> Result<Vec<FieldError>>;

    /// Builds the payment payload from a validated form.
    async fn payment_data(&self, form: &FormData) -> Result<PaymentData>;

    /// Rebuilds a payment payload from a prior order, or `None` when the
    /// method cannot repeat it (stale token, missing reference).
    async fn repeat_payment(
        &self,
        cart: &ShoppingCart,
        prior: &Order,
    ) -> Result<Option<PaymentData>>;
}

/// A catalog entry pairing a method's system name with its capability
/// object. Catalog order is significant: the first remaining entry is the
/// default once filtering leaves a single candidate.
#[derive(Clone)]
pub struct ProviderEntry {
    pub system_name: String,
    pub method: Arc<dyn PaymentMethod>,
}

impl ProviderEntry {
    pub fn new(system_name: impl Into<String>, method: Arc<dyn PaymentMethod>) -> Self {
        Self {
            system_name: system_name.into(),
            method,
        }
    }
}
