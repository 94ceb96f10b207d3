//! Checkout payment-method requirement evaluation.
//!
//! `paystep` decides whether the payment-method step of a checkout is
//! satisfied, may be skipped, or still needs user input, and applies default
//! or previously-used payment methods where store policy allows.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
