use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use paystep::application::evaluator::{PaymentPolicy, PaymentStep, StepInput};
use paystep::domain::cart::{LineItem, Money, ShoppingCart};
use paystep::domain::order::Order;
use paystep::domain::ports::{
    PreferenceStore, SharedCartTotals, SharedOrderHistory, SharedPreferenceStore,
    SharedProviderCatalog,
};
use paystep::domain::provider::ProviderEntry;
use paystep::domain::session::CheckoutSession;
use paystep::infrastructure::in_memory::{
    InMemoryCatalog, InMemoryOrderHistory, InMemoryPreferenceStore, ItemizedTotals,
};
use paystep::infrastructure::providers::{
    CARD, CASH_ON_DELIVERY, CardPayment, CashOnDelivery, INVOICE, InvoicePayment,
};
use paystep::interfaces::csv::event_reader::{CheckoutEvent, EventKind, EventReader};
use paystep::interfaces::csv::order_reader::OrderReader;
use paystep::interfaces::csv::verdict_writer::{VerdictRow, VerdictWriter};
#[cfg(feature = "storage-rocksdb")]
use paystep::infrastructure::rocksdb::RocksDbStore;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input checkout-events CSV file
    scenario: PathBuf,

    /// Prior orders CSV used to seed the order history
    #[arg(long)]
    orders: Option<PathBuf>,

    /// Preferred-method seeds as `<customer>=<method>` (repeatable)
    #[arg(long = "preferred")]
    preferred: Vec<String>,

    /// Payment methods registered in the catalog
    #[arg(long, value_delimiter = ',', default_value = "invoice,card,cod")]
    providers: Vec<String>,

    /// Skip the step when a single non-interactive method is available
    #[arg(long)]
    skip_single_option: bool,

    /// Auto-select a method from preference or order history
    #[arg(long)]
    quick_checkout: bool,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paystep=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let catalog = build_catalog(&cli.providers).await?;
    let totals: SharedCartTotals = Arc::new(ItemizedTotals);

    let orders = load_orders(cli.orders.as_deref())?;
    let (history, preferences) = build_stores(cli.db_path.as_deref(), orders).await?;

    for seed in &cli.preferred {
        let (customer, method) = seed
            .split_once('=')
            .ok_or_else(|| miette!("invalid --preferred value: {seed}"))?;
        let customer: u64 = customer.parse().into_diagnostic()?;
        let mut preference = preferences.load(customer).await.into_diagnostic()?;
        preference.preferred = Some(method.to_string());
        preferences.save(customer, preference).await.into_diagnostic()?;
    }

    let policy = PaymentPolicy {
        skip_single_option: cli.skip_single_option,
        quick_checkout: cli.quick_checkout,
    };

    // One session and one step instance per session id, so the one-shot
    // skip decision behaves as it does across requests of one step visit.
    let mut checkouts: HashMap<String, (CheckoutSession, PaymentStep)> = HashMap::new();
    let mut rows = Vec::new();

    let file = File::open(&cli.scenario).into_diagnostic()?;
    for event_result in EventReader::new(file).events() {
        let event = match event_result {
            Ok(event) => event,
            Err(e) => {
                eprintln!("Error reading event: {}", e);
                continue;
            }
        };

        let cart = cart_for(&event);
        let input = match step_input(&event) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("Error evaluating event: {}", e);
                continue;
            }
        };

        let (session, step) = checkouts.entry(event.session.clone()).or_insert_with(|| {
            (
                CheckoutSession::new(),
                PaymentStep::new(
                    catalog.clone(),
                    totals.clone(),
                    history.clone(),
                    preferences.clone(),
                    policy,
                ),
            )
        });

        match step.evaluate(&cart, session, input).await {
            Ok(verdict) => {
                let selected = match preferences.load(event.customer).await {
                    Ok(preference) => preference.selected,
                    Err(e) => {
                        eprintln!("Error reading preference: {}", e);
                        None
                    }
                };
                rows.push(VerdictRow::new(
                    &event.session,
                    event.event.label(),
                    &verdict,
                    selected,
                    session.payment_summary.clone(),
                ));
            }
            Err(e) => eprintln!("Error evaluating event: {}", e),
        }
    }

    let stdout = io::stdout();
    let mut writer = VerdictWriter::new(stdout.lock());
    writer.write_rows(rows).into_diagnostic()?;

    Ok(())
}

async fn build_catalog(names: &[String]) -> Result<SharedProviderCatalog> {
    let catalog = InMemoryCatalog::new();
    for name in names {
        let entry = match name.as_str() {
            INVOICE => ProviderEntry::new(INVOICE, Arc::new(InvoicePayment)),
            CARD => ProviderEntry::new(CARD, Arc::new(CardPayment)),
            CASH_ON_DELIVERY => ProviderEntry::new(CASH_ON_DELIVERY, Arc::new(CashOnDelivery)),
            other => return Err(miette!("unknown provider: {other}")),
        };
        catalog.register(entry, true).await;
    }
    Ok(Arc::new(catalog))
}

fn load_orders(path: Option<&Path>) -> Result<Vec<Order>> {
    let mut orders = Vec::new();
    if let Some(path) = path {
        let file = File::open(path).into_diagnostic()?;
        for order_result in OrderReader::new(file).orders() {
            match order_result {
                Ok(order) => orders.push(order),
                Err(e) => eprintln!("Error reading order: {}", e),
            }
        }
    }
    Ok(orders)
}

async fn build_stores(
    db_path: Option<&Path>,
    orders: Vec<Order>,
) -> Result<(SharedOrderHistory, SharedPreferenceStore)> {
    if let Some(path) = db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            let store = RocksDbStore::open(path).into_diagnostic()?;
            for order in &orders {
                store.record_order(order).into_diagnostic()?;
            }
            return Ok((Arc::new(store.clone()), Arc::new(store)));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        {
            let _ = path;
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
        }
    }

    let history = InMemoryOrderHistory::new();
    for order in orders {
        history.record(order).await;
    }
    Ok((Arc::new(history), Arc::new(InMemoryPreferenceStore::new())))
}

/// The scenario carries the payable total directly; the cart is rebuilt as
/// a single line item so the totals adapter reproduces it.
fn cart_for(event: &CheckoutEvent) -> ShoppingCart {
    let mut cart = ShoppingCart::new(event.customer, event.store);
    cart.items.push(LineItem {
        product: "cart".to_string(),
        unit_price: Money::new(event.total),
        quantity: 1,
        recurring: event.recurring.unwrap_or(false),
    });
    cart
}

fn step_input(event: &CheckoutEvent) -> paystep::error::Result<StepInput> {
    match event.event {
        EventKind::Render => Ok(StepInput::Render),
        EventKind::Submit => {
            let method = event.method.clone().ok_or_else(|| {
                paystep::error::CheckoutError::Scenario(format!(
                    "submit row without method (session {})",
                    event.session
                ))
            })?;
            let form = event.form_data()?;
            Ok(StepInput::Submit { method, form })
        }
    }
}
