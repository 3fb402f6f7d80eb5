//! Core business entities, DTOs and repository traits

pub mod activity;
pub mod car;
pub mod fuel;
pub mod repositories;
pub mod service_record;
pub mod user;

pub use car::{Car, CarDetails};
pub use repositories::RepositoryProvider;
pub use service_record::{ServiceRecord, ServiceType};
pub use user::{User, UserRole};

pub use crate::shared::{DomainError, DomainResult};
