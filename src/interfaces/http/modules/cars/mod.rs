//! Cars module: CRUD, comparison and QR summaries

pub mod dto;
pub mod form;
pub mod handlers;

pub use dto::*;
pub use form::{CarFields, CarForm};
pub use handlers::*;
