//! HTTP REST API interfaces
//!
//! - `common`: response envelopes, error mapping and extractors
//! - `middleware`: JWT authentication and the admin guard
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
