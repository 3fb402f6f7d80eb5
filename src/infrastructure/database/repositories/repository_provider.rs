//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::activity::ActivityRepository;
use crate::domain::car::CarRepository;
use crate::domain::fuel::FuelEntryRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::service_record::ServiceRecordRepository;
use crate::domain::user::UserRepositoryInterface;

use super::activity_repository::SeaOrmActivityRepository;
use super::car_repository::SeaOrmCarRepository;
use super::fuel_entry_repository::SeaOrmFuelEntryRepository;
use super::service_repository::SeaOrmServiceRecordRepository;
use super::user_repository::UserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let car = repos.cars().find_by_id("c1").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: UserRepository,
    cars: SeaOrmCarRepository,
    services: SeaOrmServiceRecordRepository,
    fuel_entries: SeaOrmFuelEntryRepository,
    activities: SeaOrmActivityRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            cars: SeaOrmCarRepository::new(db.clone()),
            services: SeaOrmServiceRecordRepository::new(db.clone()),
            fuel_entries: SeaOrmFuelEntryRepository::new(db.clone()),
            activities: SeaOrmActivityRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn cars(&self) -> &dyn CarRepository {
        &self.cars
    }

    fn services(&self) -> &dyn ServiceRecordRepository {
        &self.services
    }

    fn fuel_entries(&self) -> &dyn FuelEntryRepository {
        &self.fuel_entries
    }

    fn activities(&self) -> &dyn ActivityRepository {
        &self.activities
    }
}
