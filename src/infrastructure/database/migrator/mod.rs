//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_cars;
mod m20240101_000003_create_services;
mod m20240101_000004_create_fuel_entries;
mod m20240101_000005_create_activities;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_cars::Migration),
            Box::new(m20240101_000003_create_services::Migration),
            Box::new(m20240101_000004_create_fuel_entries::Migration),
            Box::new(m20240101_000005_create_activities::Migration),
        ]
    }
}
