//! CO2 Exchange Orders

pub mod admin;
pub mod errors;
pub mod models;
pub mod service;

pub use admin::ExchangeOrderAdmin;
pub use errors::{ExchangeOrderAdminError, ExchangeOrderError, ExchangeOrdersServiceError};
pub use service::*;
