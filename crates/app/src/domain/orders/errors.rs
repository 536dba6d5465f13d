//! Order backend errors.

use thiserror::Error;

use crate::http::ApiError;

/// Backend codes meaning the cart references something the catalog no longer has.
pub const STALE_CART_CODES: [&str; 2] = ["PRODUCT_NOT_FOUND", "BUNDLE_NOT_FOUND"];

#[derive(Debug, Error)]
pub enum OrderBackendError {
    #[error("order backend unavailable: {0}")]
    Unavailable(#[from] ApiError),

    #[error("{}", message.as_deref().unwrap_or("order was rejected"))]
    Rejected {
        code: Option<String>,
        message: Option<String>,
    },
}

impl OrderBackendError {
    /// Whether the backend rejected the order because the cart is out of date.
    #[must_use]
    pub fn is_stale_cart(&self) -> bool {
        match self {
            Self::Rejected {
                code: Some(code), ..
            } => STALE_CART_CODES.contains(&code.as_str()),
            _ => false,
        }
    }
}
