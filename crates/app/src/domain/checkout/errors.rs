//! Checkout errors.

use carbo::{checkout::FormErrors, pricing::PricingError};
use thiserror::Error;

use crate::domain::{orders::OrderBackendError, payments::PaymentError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("your cart is empty")]
    EmptyCart,

    #[error(transparent)]
    InvalidForm(#[from] FormErrors),

    #[error("{}", errors.join("; "))]
    InvalidCart { errors: Vec<String> },

    #[error("could not price the order: {0}")]
    Pricing(#[from] PricingError),

    #[error("some items in your cart are no longer available, please refresh your cart")]
    StaleCart(#[source] OrderBackendError),

    #[error(transparent)]
    Order(OrderBackendError),

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

impl From<OrderBackendError> for CheckoutError {
    fn from(error: OrderBackendError) -> Self {
        if error.is_stale_cart() {
            Self::StaleCart(error)
        } else {
            Self::Order(error)
        }
    }
}
