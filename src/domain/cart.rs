use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// A monetary value in the store currency.
///
/// This is a wrapper around `rust_decimal::Decimal` to provide type safety
/// for cart totals and line prices.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Money(pub Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// A single cart position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: String,
    pub unit_price: Money,
    pub quantity: u32,
    /// The item is billed on a recurring schedule (subscription).
    pub recurring: bool,
}

impl LineItem {
    pub fn subtotal(&self) -> Money {
        Money(self.unit_price.0 * Decimal::from(self.quantity))
    }
}

/// The customer's cart as the payment step sees it. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingCart {
    pub customer: u64,
    pub store: u32,
    pub items: Vec<LineItem>,
}

impl ShoppingCart {
    pub fn new(customer: u64, store: u32) -> Self {
        Self {
            customer,
            store,
            items: Vec::new(),
        }
    }

    /// True when any position is billed on a recurring schedule.
    pub fn has_recurring_item(&self) -> bool {
        self.items.iter().any(|item| item.recurring)
    }
}
