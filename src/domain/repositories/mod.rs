//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to all per-aggregate repositories.

use super::activity::ActivityRepository;
use super::car::CarRepository;
use super::fuel::FuelEntryRepository;
use super::service_record::ServiceRecordRepository;
use super::user::UserRepositoryInterface;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let car = repos.cars().find_by_id("c1").await?;
///     let history = repos.services().list_for_car("c1").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn cars(&self) -> &dyn CarRepository;
    fn services(&self) -> &dyn ServiceRecordRepository;
    fn fuel_entries(&self) -> &dyn FuelEntryRepository;
    fn activities(&self) -> &dyn ActivityRepository;
}
