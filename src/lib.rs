//! # Car Management System
//!
//! REST backend for a car inventory with maintenance history, fuel tracking,
//! reports and an audit log.
//!
//! ## Architecture
//!
//! - **domain**: Core business entities, validation rules and repository traits
//! - **application**: Use cases (identity, cars, services, fuel, activity, reports)
//! - **infrastructure**: SeaORM persistence, crypto, image storage
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: Runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_router;
