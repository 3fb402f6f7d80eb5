//! Liveness banner and health check

pub mod handlers;

pub use handlers::*;
