use crate::domain::cart::{Money, ShoppingCart};
use crate::domain::order::Order;
use crate::domain::preference::CustomerPaymentPreference;
use crate::domain::provider::ProviderEntry;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Supplies the payment methods available to a cart in a store.
#[async_trait]
pub trait ProviderCatalog: Send + Sync {
    /// Active methods for this cart, in display order.
    async fn active_providers(
        &self,
        cart: &ShoppingCart,
        store: u32,
    ) -> Result<Vec<ProviderEntry>>;

    /// Looks a method up by system name. `include_inactive` also finds
    /// methods currently switched off in the store.
    async fn provider_by_system_name(
        &self,
        system_name: &str,
        include_inactive: bool,
        store: u32,
    ) -> Result<Option<ProviderEntry>>;
}

/// Computes the payable cart total.
#[async_trait]
pub trait CartTotals: Send + Sync {
    async fn cart_total(&self, cart: &ShoppingCart, include_reward_points: bool) -> Result<Money>;
}

/// Finds previously placed orders.
#[async_trait]
pub trait OrderHistory: Send + Sync {
    /// The customer's most recent order in this store paid with one of the
    /// given method names.
    async fn latest_order_with_method(
        &self,
        customer: u64,
        store: u32,
        method_names: &[String],
    ) -> Result<Option<Order>>;
}

/// Loads and persists the customer's payment preference record.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Missing customers load as the empty default preference.
    async fn load(&self, customer: u64) -> Result<CustomerPaymentPreference>;

    async fn save(&self, customer: u64, preference: CustomerPaymentPreference) -> Result<()>;
}

pub type SharedProviderCatalog = Arc<dyn ProviderCatalog>;
pub type SharedCartTotals = Arc<dyn CartTotals>;
pub type SharedOrderHistory = Arc<dyn OrderHistory>;
pub type SharedPreferenceStore = Arc<dyn PreferenceStore>;
