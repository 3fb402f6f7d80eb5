use std::sync::Arc;

use tracing::info;

use crate::application::Actor;
use crate::domain::car::can_modify;
use crate::domain::fuel::{validate_fuel_entry, CreateFuelEntryDto, FuelEntry, FuelStats};
use crate::domain::{Car, DomainError, DomainResult, RepositoryProvider};

pub struct FuelService {
    repos: Arc<dyn RepositoryProvider>,
}

impl FuelService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn owned_car(&self, actor: &Actor, car_id: &str) -> DomainResult<Car> {
        let car = self
            .repos
            .cars()
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Car", car_id))?;
        if !can_modify(&car, &actor.user_id, actor.is_admin) {
            return Err(DomainError::Forbidden(
                "Not authorized to access fuel entries for this car".into(),
            ));
        }
        Ok(car)
    }

    pub async fn list(&self, actor: &Actor, car_id: &str) -> DomainResult<Vec<FuelEntry>> {
        self.owned_car(actor, car_id).await?;
        self.repos.fuel_entries().list_for_car(car_id).await
    }

    pub async fn add(&self, actor: &Actor, mut dto: CreateFuelEntryDto) -> DomainResult<FuelEntry> {
        self.owned_car(actor, &dto.car_id).await?;
        dto.notes = dto
            .notes
            .take()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        dto.created_by = Some(actor.user_id.clone());
        validate_fuel_entry(&dto)?;

        let entry = self.repos.fuel_entries().create(dto).await?;
        info!(entry_id = %entry.id, car_id = %entry.car_id, "Fuel entry added");
        Ok(entry)
    }

    pub async fn delete(&self, actor: &Actor, car_id: &str, entry_id: &str) -> DomainResult<()> {
        self.owned_car(actor, car_id).await?;
        let entry = self
            .repos
            .fuel_entries()
            .find_by_id(entry_id)
            .await?
            .filter(|e| e.car_id == car_id)
            .ok_or_else(|| DomainError::not_found("Fuel entry", entry_id))?;

        self.repos.fuel_entries().delete(&entry.id).await?;
        info!(entry_id = %entry.id, car_id, "Fuel entry deleted");
        Ok(())
    }

    pub async fn stats(&self, actor: &Actor, car_id: &str) -> DomainResult<FuelStats> {
        let entries = self.list(actor, car_id).await?;
        Ok(FuelStats::compute(&entries))
    }
}
