//! Payment gateway errors.

use thiserror::Error;

use crate::http::ApiError;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment gateway unavailable: {0}")]
    Unavailable(#[from] ApiError),

    #[error("{}", message.as_deref().unwrap_or("payment could not be started"))]
    Declined {
        message: Option<String>,
        response_code: Option<String>,
    },

    #[error("payment gateway did not return a payment URL")]
    MissingRedirect,
}
