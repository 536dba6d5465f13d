//! Orders

pub mod errors;
pub mod models;
pub mod service;

pub use errors::OrderBackendError;
pub use service::*;
