//! Car repository interface

use async_trait::async_trait;

use super::model::{Car, CreateCarDto, UpdateCarDto};
use crate::domain::DomainResult;

#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Newest first; `owner_id` restricts the list to one owner.
    async fn list(&self, owner_id: Option<&str>) -> DomainResult<Vec<Car>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Car>>;
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Car>>;
    async fn create(&self, dto: CreateCarDto) -> DomainResult<Car>;
    async fn update(&self, id: &str, dto: UpdateCarDto) -> DomainResult<Option<Car>>;
    /// Removes the car with its services and fuel entries atomically.
    /// Returns `false` when no such car exists.
    async fn delete_cascade(&self, id: &str) -> DomainResult<bool>;
    async fn delete_all(&self) -> DomainResult<u64>;
}
