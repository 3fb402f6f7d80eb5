//! Users module: registration, login, profile and the admin user list

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
