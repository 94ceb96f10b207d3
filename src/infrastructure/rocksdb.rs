use crate::domain::order::Order;
use crate::domain::ports::{OrderHistory, PreferenceStore};
use crate::domain::preference::CustomerPaymentPreference;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for customer payment preferences.
pub const CF_PREFERENCES: &str = "preferences";
/// Column Family for prior orders.
pub const CF_ORDERS: &str = "orders";

/// A persistent store implementation using RocksDB.
///
/// Keeps customer payment preferences and prior orders in separate Column
/// Families, so a selection made in one run survives into the next.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// both column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_preferences = ColumnFamilyDescriptor::new(CF_PREFERENCES, Options::default());
        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_preferences, cf_orders])?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Persists a prior order so history lookups can find it.
    pub fn record_order(&self, order: &Order) -> Result<()> {
        let cf = self
            .db
            .cf_handle(CF_ORDERS)
            .ok_or_else(|| CheckoutError::Internal("orders column family not found".to_string()))?;

        let key = order.id.to_be_bytes();
        let value = serde_json::to_vec(order)?;
        self.db.put_cf(&cf, key, value)?;

        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for RocksDbStore {
    async fn load(&self, customer: u64) -> Result<CustomerPaymentPreference> {
        let cf = self.db.cf_handle(CF_PREFERENCES).ok_or_else(|| {
            CheckoutError::Internal("preferences column family not found".to_string())
        })?;

        let key = customer.to_be_bytes();
        match self.db.get_cf(&cf, key)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(CustomerPaymentPreference::default()),
        }
    }

    async fn save(&self, customer: u64, preference: CustomerPaymentPreference) -> Result<()> {
        let cf = self.db.cf_handle(CF_PREFERENCES).ok_or_else(|| {
            CheckoutError::Internal("preferences column family not found".to_string())
        })?;

        let key = customer.to_be_bytes();
        let value = serde_json::to_vec(&preference)?;
        self.db.put_cf(&cf, key, value)?;

        Ok(())
    }
}

#[async_trait]
impl OrderHistory for RocksDbStore {
    async fn latest_order_with_method(
        &self,
        customer: u64,
        store: u32,
        method_names: &[String],
    ) -> Result<Option<Order>> {
        let cf = self
            .db
            .cf_handle(CF_ORDERS)
            .ok_or_else(|| CheckoutError::Internal("orders column family not found".to_string()))?;

        let mut latest: Option<Order> = None;
        let iter = self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start);

        for item in iter {
            let (_key, value) = item?;
            let order: Order = serde_json::from_slice(&value)?;
            if order.customer != customer || order.store != store {
                continue;
            }
            if !method_names
                .iter()
                .any(|name| name.eq_ignore_ascii_case(&order.payment_method))
            {
                continue;
            }
            if latest.as_ref().is_none_or(|o| order.placed_at > o.placed_at) {
                latest = Some(order);
            }
        }

        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn order(id: u64, method: &str, placed_at: i64) -> Order {
        Order {
            id,
            customer: 1,
            store: 1,
            payment_method: method.to_string(),
            placed_at,
            reference: None,
        }
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_PREFERENCES).is_some());
        assert!(store.db.cf_handle(CF_ORDERS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_preference_roundtrip() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();

        assert_eq!(
            store.load(1).await.unwrap(),
            CustomerPaymentPreference::default()
        );

        let preference = CustomerPaymentPreference {
            selected: Some("invoice".to_string()),
            preferred: Some("card".to_string()),
        };
        store.save(1, preference.clone()).await.unwrap();
        assert_eq!(store.load(1).await.unwrap(), preference);
    }

    #[tokio::test]
    async fn test_rocksdb_order_history() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();

        store.record_order(&order(1, "invoice", 100)).unwrap();
        store.record_order(&order(2, "invoice", 300)).unwrap();
        store.record_order(&order(3, "card", 400)).unwrap();

        let found = store
            .latest_order_with_method(1, 1, &["invoice".to_string()])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, 2);

        assert!(
            store
                .latest_order_with_method(1, 1, &["cod".to_string()])
                .await
                .unwrap()
                .is_none()
        );
    }
}
