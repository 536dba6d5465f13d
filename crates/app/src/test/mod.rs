//! Test support.

pub(crate) mod server;
