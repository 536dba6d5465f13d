//! Catalog

pub mod errors;
pub mod models;
pub mod service;

pub use errors::CatalogError;
pub use service::*;
