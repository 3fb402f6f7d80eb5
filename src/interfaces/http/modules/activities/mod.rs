//! Activity log endpoints under `/api/activities`

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
