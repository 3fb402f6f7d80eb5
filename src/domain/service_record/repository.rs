//! Service record repository interface

use async_trait::async_trait;

use super::model::{CreateServiceDto, ServiceRecord, UpdateServiceDto};
use crate::domain::DomainResult;

#[async_trait]
pub trait ServiceRecordRepository: Send + Sync {
    /// All records, newest date first.
    async fn list_all(&self) -> DomainResult<Vec<ServiceRecord>>;
    /// Records of one car, newest date first.
    async fn list_for_car(&self, car_id: &str) -> DomainResult<Vec<ServiceRecord>>;
    async fn list_for_cars(&self, car_ids: &[String]) -> DomainResult<Vec<ServiceRecord>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceRecord>>;
    async fn create(&self, dto: CreateServiceDto) -> DomainResult<ServiceRecord>;
    async fn update(&self, id: &str, dto: UpdateServiceDto)
        -> DomainResult<Option<ServiceRecord>>;
    async fn delete(&self, id: &str) -> DomainResult<bool>;
}
