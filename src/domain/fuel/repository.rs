use async_trait::async_trait;

use super::model::{CreateFuelEntryDto, FuelEntry};
use crate::domain::DomainResult;

#[async_trait]
pub trait FuelEntryRepository: Send + Sync {
    /// Entries of one car, newest date first.
    async fn list_for_car(&self, car_id: &str) -> DomainResult<Vec<FuelEntry>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<FuelEntry>>;
    async fn create(&self, dto: CreateFuelEntryDto) -> DomainResult<FuelEntry>;
    async fn delete(&self, id: &str) -> DomainResult<bool>;
}
