use crate::domain::cart::ShoppingCart;
use crate::domain::order::Order;
use crate::domain::provider::{
    FieldError, FormData, PaymentData, PaymentMethod, RecurringSupport,
};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;

pub const INVOICE: &str = "invoice";
pub const CARD: &str = "card";
pub const CASH_ON_DELIVERY: &str = "cod";

/// Invoice billing. Nothing to collect from the user; recurring carts are
/// billed manually per cycle.
pub struct InvoicePayment;

#[async_trait]
impl PaymentMethod for InvoicePayment {
    fn requires_selection(&self) -> bool {
        false
    }

    fn recurring_support(&self) -> RecurringSupport {
        RecurringSupport::Manual
    }

    fn summary(&self) -> String {
        "Payment by invoice".to_string()
    }

    async fn validate(&self, _form: &FormData) -> Result<Vec<FieldError>> {
        Ok(Vec::new())
    }

    async fn payment_data(&self, _form: &FormData) -> Result<PaymentData> {
        Ok(PaymentData::new(INVOICE))
    }

    async fn repeat_payment(
        &self,
        _cart: &ShoppingCart,
        _prior: &Order,
    ) -> Result<Option<PaymentData>> {
        Ok(Some(PaymentData::new(INVOICE)))
    }
}

/// Card payments. The user fills the card form; repeats are only possible
/// from a capture reference stored with the prior order.
pub struct CardPayment;

#[async_trait]
impl PaymentMethod for CardPayment {
    fn requires_selection(&self) -> bool {
        true
    }

    fn recurring_support(&self) -> RecurringSupport {
        RecurringSupport::Automatic
    }

    fn summary(&self) -> String {
        "Credit or debit card".to_string()
    }

    async fn validate(&self, form: &FormData) -> Result<Vec<FieldError>> {
        let mut errors = Vec::new();

        match form.first("number") {
            None | Some("") => {
                errors.push(FieldError::new("number", "Card number is required"));
            }
            Some(number) if !number.chars().all(|c| c.is_ascii_digit()) => {
                errors.push(FieldError::new("number", "Card number must be digits only"));
            }
            Some(number) if number.len() < 12 => {
                errors.push(FieldError::new("number", "Card number is too short"));
            }
            Some(_) => {}
        }

        if form.first("holder").is_none_or(str::is_empty) {
            errors.push(FieldError::new("holder", "Card holder is required"));
        }

        Ok(errors)
    }

    async fn payment_data(&self, form: &FormData) -> Result<PaymentData> {
        let number = form
            .first("number")
            .ok_or_else(|| CheckoutError::Provider("card form is missing the number".to_string()))?;
        let holder = form.first("holder").unwrap_or_default();
        let last4 = &number[number.len().saturating_sub(4)..];

        Ok(PaymentData::new(CARD)
            .with_attribute("last4", last4)
            .with_attribute("holder", holder))
    }

    async fn repeat_payment(
        &self,
        _cart: &ShoppingCart,
        prior: &Order,
    ) -> Result<Option<PaymentData>> {
        // No capture reference means nothing to charge against.
        Ok(prior
            .reference
            .as_deref()
            .map(|reference| PaymentData::new(CARD).with_attribute("reference", reference)))
    }
}

/// Cash on delivery. No form, no recurring carts.
pub struct CashOnDelivery;

#[async_trait]
impl PaymentMethod for CashOnDelivery {
    fn requires_selection(&self) -> bool {
        false
    }

    fn recurring_support(&self) -> RecurringSupport {
        RecurringSupport::NotSupported
    }

    fn summary(&self) -> String {
        "Cash on delivery".to_string()
    }

    async fn validate(&self, _form: &FormData) -> Result<Vec<FieldError>> {
        Ok(Vec::new())
    }

    async fn payment_data(&self, _form: &FormData) -> Result<PaymentData> {
        Ok(PaymentData::new(CASH_ON_DELIVERY))
    }

    async fn repeat_payment(
        &self,
        _cart: &ShoppingCart,
        _prior: &Order,
    ) -> Result<Option<PaymentData>> {
        Ok(Some(PaymentData::new(CASH_ON_DELIVERY)))
    }
}
