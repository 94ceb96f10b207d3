use paystep::domain::order::Order;
use paystep::domain::ports::{
    OrderHistory, PreferenceStore, ProviderCatalog, SharedOrderHistory, SharedPreferenceStore,
    SharedProviderCatalog,
};
use paystep::domain::preference::CustomerPaymentPreference;
use paystep::domain::provider::ProviderEntry;
use paystep::infrastructure::in_memory::{
    InMemoryCatalog, InMemoryOrderHistory, InMemoryPreferenceStore,
};
use paystep::infrastructure::providers::{INVOICE, InvoicePayment};
use std::sync::Arc;

#[tokio::test]
async fn test_ports_as_trait_objects_across_tasks() {
    let catalog = InMemoryCatalog::new();
    catalog
        .register(ProviderEntry::new(INVOICE, Arc::new(InvoicePayment)), true)
        .await;
    let catalog: SharedProviderCatalog = Arc::new(catalog);

    let history = InMemoryOrderHistory::new();
    history
        .record(Order {
            id: 1,
            customer: 1,
            store: 1,
            payment_method: INVOICE.to_string(),
            placed_at: 100,
            reference: None,
        })
        .await;
    let history: SharedOrderHistory = Arc::new(history);

    let preferences: SharedPreferenceStore = Arc::new(InMemoryPreferenceStore::new());

    // Verify Send + Sync by spawning tasks over the shared handles.
    let catalog_handle = tokio::spawn(async move {
        catalog
            .provider_by_system_name(INVOICE, false, 1)
            .await
            .unwrap()
            .unwrap()
    });

    let history_handle = tokio::spawn(async move {
        history
            .latest_order_with_method(1, 1, &[INVOICE.to_string()])
            .await
            .unwrap()
            .unwrap()
    });

    let preferences_task = preferences.clone();
    let preference_handle = tokio::spawn(async move {
        let preference = CustomerPaymentPreference {
            selected: Some(INVOICE.to_string()),
            preferred: None,
        };
        preferences_task.save(2, preference).await.unwrap();
        preferences_task.load(2).await.unwrap()
    });

    let entry = catalog_handle.await.unwrap();
    assert_eq!(entry.system_name, INVOICE);

    let order = history_handle.await.unwrap();
    assert_eq!(order.id, 1);

    let preference = preference_handle.await.unwrap();
    assert_eq!(preference.selected.as_deref(), Some(INVOICE));
}
