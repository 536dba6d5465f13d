//! Checkout

pub mod attempt;
pub mod errors;
pub mod service;
pub mod validator;

pub use attempt::{AttemptUuid, CheckoutAttempt};
pub use errors::CheckoutError;
pub use service::{CheckoutService, CheckoutUrls, OrderReceipt};
pub use validator::CheckoutValidator;
