use serde::{Deserialize, Serialize};

/// A previously placed order, reduced to what repeat payments need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub customer: u64,
    pub store: u32,
    /// System name of the payment method the order was paid with.
    pub payment_method: String,
    /// Unix timestamp of placement; newest wins in history lookups.
    pub placed_at: i64,
    /// Provider-held capture reference, when the method stored one.
    pub reference: Option<String>,
}
