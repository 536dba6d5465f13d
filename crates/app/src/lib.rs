//! Storefront services, configuration and logging for the Carbo CLI.

pub mod config;
pub mod context;
pub mod domain;
pub mod http;
pub mod observability;
pub mod uuids;

#[cfg(test)]
mod test;
