//! Catalog service errors.

use thiserror::Error;

use crate::http::ApiError;

/// A lookup that could not be answered. Never means "not found".
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(#[from] ApiError),
}
