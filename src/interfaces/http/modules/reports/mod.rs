//! Report downloads under `/api/reports`

pub mod handlers;

pub use handlers::*;
