use serde::{Deserialize, Serialize};

/// Persisted payment choices on the customer record.
///
/// `selected` is the method chosen for the checkout currently in flight,
/// `preferred` the longer-lived hint that quick checkout may adopt. Only the
/// payment step writes this record; other components read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerPaymentPreference {
    pub selected: Option<String>,
    pub preferred: Option<String>,
}
