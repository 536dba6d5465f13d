//! Carbo
//!
//! Carbo is the pricing and checkout core of a SAR storefront selling products, bundles and
//! CO2 cylinder exchanges: cart totals, delivery fees, VAT, free-gift tiers, catalog
//! revalidation policies and the exchange-order lifecycle.

pub mod cart;
pub mod checkout;
pub mod delivery;
pub mod discounts;
pub mod fixtures;
pub mod gifts;
pub mod lifecycle;
pub mod prelude;
pub mod pricing;
pub mod settings;
pub mod validation;
