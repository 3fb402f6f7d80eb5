//! Fuel tracker endpoints under `/api/cars/{id}/fuel-entries`

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
