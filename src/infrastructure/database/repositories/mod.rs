//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod activity_repository;
pub mod car_repository;
pub mod fuel_entry_repository;
pub mod repository_provider;
pub mod service_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
