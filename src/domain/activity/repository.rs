use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Activity, ActivityCount, ActivityFilter, NewActivity};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn record(&self, activity: NewActivity) -> DomainResult<Activity>;
    /// Newest first.
    async fn list(&self, filter: ActivityFilter) -> DomainResult<PaginatedResult<Activity>>;
    async fn count_all(&self) -> DomainResult<u64>;
    async fn count_since(&self, since: DateTime<Utc>) -> DomainResult<u64>;
    /// Most frequent actions, descending by count.
    async fn top_actions(&self, limit: u64) -> DomainResult<Vec<ActivityCount>>;
    /// Most active users (activities without a user are ignored).
    async fn top_users(&self, limit: u64) -> DomainResult<Vec<ActivityCount>>;
    async fn delete_all(&self) -> DomainResult<u64>;
}
