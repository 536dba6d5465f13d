//! Exchange order errors.

use carbo::lifecycle::TransitionError;
use thiserror::Error;

use crate::http::ApiError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeOrderError {
    #[error("order has no cylinder with serial {0}")]
    UnknownCylinder(String),

    #[error("{0:?} is not an exchange order id")]
    InvalidId(String),
}

#[derive(Debug, Error)]
pub enum ExchangeOrdersServiceError {
    #[error("exchange orders unavailable: {0}")]
    Unavailable(#[from] ApiError),

    #[error("{}", message.as_deref().unwrap_or("exchange order not found"))]
    NotFound { message: Option<String> },

    #[error("{}", message.as_deref().unwrap_or("status update was rejected"))]
    Rejected { message: Option<String> },
}

#[derive(Debug, Error)]
pub enum ExchangeOrderAdminError {
    #[error(transparent)]
    Service(#[from] ExchangeOrdersServiceError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}
