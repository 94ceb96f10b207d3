use crate::domain::cart::{Money, ShoppingCart};
use crate::domain::order::Order;
use crate::domain::ports::{CartTotals, OrderHistory, PreferenceStore, ProviderCatalog};
use crate::domain::preference::CustomerPaymentPreference;
use crate::domain::provider::ProviderEntry;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

struct CatalogEntry {
    entry: ProviderEntry,
    active: bool,
}

/// A thread-safe in-memory provider catalog.
///
/// Single-tenant: the same registrations serve every store. `Clone` shares
/// the underlying registry, so a catalog can be mutated while evaluators
/// hold it through the port.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    entries: Arc<RwLock<Vec<CatalogEntry>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider. Registration order is the display order.
    pub async fn register(&self, entry: ProviderEntry, active: bool) {
        let mut entries = self.entries.write().await;
        entries.push(CatalogEntry { entry, active });
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }
}

#[async_trait]
impl ProviderCatalog for InMemoryCatalog {
    async fn active_providers(
        &self,
        _cart: &ShoppingCart,
        _store: u32,
    ) -> Result<Vec<ProviderEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.active)
            .map(|e| e.entry.clone())
            .collect())
    }

    async fn provider_by_system_name(
        &self,
        system_name: &str,
        include_inactive: bool,
        _store: u32,
    ) -> Result<Option<ProviderEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| include_inactive || e.active)
            .find(|e| e.entry.system_name.eq_ignore_ascii_case(system_name))
            .map(|e| e.entry.clone()))
    }
}

/// Cart-total adapter that sums the line items.
pub struct ItemizedTotals;

#[async_trait]
impl CartTotals for ItemizedTotals {
    async fn cart_total(
        &self,
        cart: &ShoppingCart,
        _include_reward_points: bool,
    ) -> Result<Money> {
        let mut total = Money::ZERO;
        for item in &cart.items {
            total += item.subtotal();
        }
        Ok(total)
    }
}

/// A thread-safe in-memory order history.
#[derive(Default, Clone)]
pub struct InMemoryOrderHistory {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, order: Order) {
        let mut orders = self.orders.write().await;
        orders.push(order);
    }
}

#[async_trait]
impl OrderHistory for InMemoryOrderHistory {
    async fn latest_order_with_method(
        &self,
        customer: u64,
        store: u32,
        method_names: &[String],
    ) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .filter(|o| o.customer == customer && o.store == store)
            .filter(|o| {
                method_names
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(&o.payment_method))
            })
            .max_by_key(|o| o.placed_at)
            .cloned())
    }
}

/// A thread-safe in-memory preference store.
#[derive(Default, Clone)]
pub struct InMemoryPreferenceStore {
    preferences: Arc<RwLock<HashMap<u64, CustomerPaymentPreference>>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn load(&self, customer: u64) -> Result<CustomerPaymentPreference> {
        let preferences = self.preferences.read().await;
        Ok(preferences.get(&customer).cloned().unwrap_or_default())
    }

    async fn save(&self, customer: u64, preference: CustomerPaymentPreference) -> Result<()> {
        let mut preferences = self.preferences.write().await;
        preferences.insert(customer, preference);
        Ok(())
    }
}
