//! Two-factor enrolment endpoints under `/api/auth/2fa`

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
