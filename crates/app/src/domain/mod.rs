//! Carbo Domain Concerns

pub mod catalog;
pub mod checkout;
pub mod exchange_orders;
pub mod orders;
pub mod payments;
