use crate::domain::cart::ShoppingCart;
use crate::domain::ports::{
    CartTotals, OrderHistory, PreferenceStore, ProviderCatalog, SharedCartTotals,
    SharedOrderHistory, SharedPreferenceStore, SharedProviderCatalog,
};
use crate::domain::provider::{FormData, PaymentMethod, ProviderEntry, RecurringSupport};
use crate::domain::session::{CheckoutSession, HAS_ONLY_ONE_ACTIVE_METHOD};
use crate::domain::verdict::Verdict;
use crate::error::Result;
use serde_json::json;
use tracing::debug;

/// What the checkout controller is asking the step to do.
#[derive(Debug, Clone, PartialEq)]
pub enum StepInput {
    /// The step is being shown; decide whether it can be skipped.
    Render,
    /// The user submitted this step's form.
    Submit { method: String, form: FormData },
}

/// Per-store policy switches for the payment step.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentPolicy {
    /// Skip the step when exactly one method is available and it does not
    /// require explicit selection.
    pub skip_single_option: bool,
    /// Auto-select a method from the customer's preference or order history.
    pub quick_checkout: bool,
}

/// One-shot skip decision, evaluated at most once per step instance.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SkipDecision {
    Unevaluated,
    Evaluated(bool),
}

impl SkipDecision {
    fn value(self) -> bool {
        match self {
            SkipDecision::Unevaluated => false,
            SkipDecision::Evaluated(skip) => skip,
        }
    }
}

/// The payment-method requirement step.
///
/// Construct one instance per step visit and reuse it for every evaluation
/// within that visit: the skip decision is cached on the instance and is not
/// re-derived, even if the provider catalog changes between calls. A fresh
/// instance starts unevaluated.
pub struct PaymentStep {
    catalog: SharedProviderCatalog,
    totals: SharedCartTotals,
    history: SharedOrderHistory,
    preferences: SharedPreferenceStore,
    policy: PaymentPolicy,
    skip: SkipDecision,
}

impl PaymentStep {
    /// Position of this step among the checkout requirement steps.
    pub const ORDER: u32 = 40;

    pub fn new(
        catalog: SharedProviderCatalog,
        totals: SharedCartTotals,
        history: SharedOrderHistory,
        preferences: SharedPreferenceStore,
        policy: PaymentPolicy,
    ) -> Self {
        Self {
            catalog,
            totals,
            history,
            preferences,
            policy,
            skip: SkipDecision::Unevaluated,
        }
    }

    /// Evaluates the step for `cart`, mutating `session` and the persisted
    /// customer preference as dictated by the outcome.
    pub async fn evaluate(
        &mut self,
        cart: &ShoppingCart,
        session: &mut CheckoutSession,
        input: StepInput,
    ) -> Result<Verdict> {
        match input {
            StepInput::Submit { method, form } => self.submit(cart, session, &method, &form).await,
            StepInput::Render => self.render(cart, session).await,
        }
    }

    async fn submit(
        &mut self,
        cart: &ShoppingCart,
        session: &mut CheckoutSession,
        method: &str,
        form: &FormData,
    ) -> Result<Verdict> {
        let Some(entry) = self
            .catalog
            .provider_by_system_name(method, true, cart.store)
            .await?
        else {
            debug!(method, "submitted payment method not found");
            return Ok(Verdict::resolved(false, false));
        };

        // The selection is persisted before the form is validated: an
        // invalid attempt still sticks as the customer's last choice.
        self.select_method(cart.customer, &entry.system_name).await?;

        session.form_echo = form.echo();

        let errors = entry.method.validate(form).await?;
        if !errors.is_empty() {
            debug!(method = %entry.system_name, count = errors.len(), "payment form rejected");
            return Ok(Verdict::invalid(errors));
        }

        let data = entry.method.payment_data(form).await?;
        session.payment_data = Some(data);
        session.payment_summary = Some(entry.method.summary());
        Ok(Verdict::resolved(true, false))
    }

    async fn render(
        &mut self,
        cart: &ShoppingCart,
        session: &mut CheckoutSession,
    ) -> Result<Verdict> {
        if self.skip == SkipDecision::Unevaluated {
            let total = self.totals.cart_total(cart, false).await?;
            session.payment_required = !total.is_zero();

            let mut skip = true;
            if session.payment_required {
                skip = false;
                if self.policy.skip_single_option {
                    let providers = self.eligible_providers(cart).await?;
                    let single = providers.len() == 1;
                    session.set_property(HAS_ONLY_ONE_ACTIVE_METHOD, json!(single));
                    if single && !providers[0].method.requires_selection() {
                        self.select_method(cart.customer, &providers[0].system_name)
                            .await?;
                        skip = true;
                    }
                }
            }

            debug!(required = session.payment_required, skip, "payment step decided");
            session.selection_skipped = skip;
            self.skip = SkipDecision::Evaluated(skip);
        }

        if self.policy.quick_checkout && session.payment_required {
            self.try_quick_checkout(cart, session).await?;
        }

        let preference = self.preferences.load(cart.customer).await?;
        Ok(Verdict::resolved(
            preference.selected.is_some(),
            self.skip.value(),
        ))
    }

    /// Quick checkout: adopt the customer's preferred method, or rebuild a
    /// payment from the latest prior order. Every miss is a silent no-op
    /// that leaves the step pending for manual selection.
    async fn try_quick_checkout(
        &mut self,
        cart: &ShoppingCart,
        session: &mut CheckoutSession,
    ) -> Result<()> {
        let preference = self.preferences.load(cart.customer).await?;
        if preference.selected.is_some() {
            return Ok(());
        }

        let providers = self.eligible_providers(cart).await?;

        if let Some(preferred) = preference.preferred.as_deref()
            && let Some(entry) = providers
                .iter()
                .find(|p| p.system_name.eq_ignore_ascii_case(preferred))
        {
            self.select_method(cart.customer, &entry.system_name).await?;
            session.selection_skipped = true;
            self.skip = SkipDecision::Evaluated(true);
            return Ok(());
        }

        let quick: Vec<&ProviderEntry> = providers
            .iter()
            .filter(|p| !p.method.requires_selection())
            .collect();
        if quick.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = quick.iter().map(|p| p.system_name.clone()).collect();
        let Some(order) = self
            .history
            .latest_order_with_method(cart.customer, cart.store, &names)
            .await?
        else {
            return Ok(());
        };

        let Some(entry) = quick
            .iter()
            .find(|p| p.system_name.eq_ignore_ascii_case(&order.payment_method))
        else {
            return Ok(());
        };

        let Some(repeat) = entry.method.repeat_payment(cart, &order).await? else {
            debug!(method = %entry.system_name, order = order.id, "repeat payment declined");
            return Ok(());
        };

        self.select_method(cart.customer, &entry.system_name).await?;
        session.payment_data = Some(repeat);
        session.payment_summary = Some(entry.method.summary());
        session.selection_skipped = true;
        self.skip = SkipDecision::Evaluated(true);
        Ok(())
    }

    /// Active providers for the cart, minus methods that cannot charge
    /// recurring carts when the cart contains a recurring item.
    async fn eligible_providers(&self, cart: &ShoppingCart) -> Result<Vec<ProviderEntry>> {
        let mut providers = self.catalog.active_providers(cart, cart.store).await?;
        if cart.has_recurring_item() {
            providers.retain(|p| p.method.recurring_support() != RecurringSupport::NotSupported);
        }
        Ok(providers)
    }

    /// Durably records `system_name` as the customer's selected method.
    async fn select_method(&self, customer: u64, system_name: &str) -> Result<()> {
        let mut preference = self.preferences.load(customer).await?;
        preference.selected = Some(system_name.to_string());
        self.preferences.save(customer, preference).await
    }
}
