//! Service records (maintenance history) of cars

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
