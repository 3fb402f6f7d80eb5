use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::application::Actor;
use crate::domain::car::can_modify;
use crate::domain::service_record::{
    validate_new_service, validate_service_update, CreateServiceDto, UpdateServiceDto,
};
use crate::domain::{Car, DomainError, DomainResult, RepositoryProvider, ServiceRecord};

/// `{id, brand, model, year}` projection of the car a record belongs to
#[derive(Debug, Clone)]
pub struct CarRef {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
}

impl From<&Car> for CarRef {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id.clone(),
            brand: car.brand.clone(),
            model: car.model.clone(),
            year: car.year,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceWithCar {
    pub record: ServiceRecord,
    pub car: Option<CarRef>,
}

pub struct ServiceRecordService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ServiceRecordService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn car(&self, car_id: &str) -> DomainResult<Car> {
        self.repos
            .cars()
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Car", car_id))
    }

    /// Every record with its car, newest first.
    pub async fn list_all(&self) -> DomainResult<Vec<ServiceWithCar>> {
        let records = self.repos.services().list_all().await?;
        let mut car_ids: Vec<String> = records.iter().map(|r| r.car_id.clone()).collect();
        car_ids.sort();
        car_ids.dedup();

        let cars: HashMap<String, CarRef> = self
            .repos
            .cars()
            .find_by_ids(&car_ids)
            .await?
            .iter()
            .map(|c| (c.id.clone(), CarRef::from(c)))
            .collect();

        Ok(records
            .into_iter()
            .map(|record| ServiceWithCar {
                car: cars.get(&record.car_id).cloned(),
                record,
            })
            .collect())
    }

    /// Records visible to `actor`: all of them for admins, otherwise only
    /// those of the actor's own cars.
    pub async fn list_visible(&self, actor: &Actor) -> DomainResult<Vec<ServiceRecord>> {
        if actor.is_admin {
            return self.repos.services().list_all().await;
        }
        let car_ids: Vec<String> = self
            .repos
            .cars()
            .list(Some(&actor.user_id))
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        self.repos.services().list_for_cars(&car_ids).await
    }

    pub async fn list_for_car(&self, actor: &Actor, car_id: &str) -> DomainResult<Vec<ServiceRecord>> {
        let car = self.car(car_id).await?;
        if !can_modify(&car, &actor.user_id, actor.is_admin) {
            return Err(DomainError::Forbidden(
                "Not authorized to view services for this car".into(),
            ));
        }
        self.repos.services().list_for_car(car_id).await
    }

    pub async fn create(&self, actor: &Actor, mut dto: CreateServiceDto) -> DomainResult<ServiceRecord> {
        let car = self.car(&dto.car_id).await?;
        if !can_modify(&car, &actor.user_id, actor.is_admin) {
            return Err(DomainError::Forbidden(
                "Not authorized to add services to this car".into(),
            ));
        }
        validate_new_service(&mut dto)?;

        let record = self.repos.services().create(dto).await?;
        info!(service_id = %record.id, car_id = %record.car_id, "Service record created");
        Ok(record)
    }

    /// Load a record whose car the actor manages.
    async fn find_owned(&self, actor: &Actor, id: &str, verb: &str) -> DomainResult<ServiceRecord> {
        let record = self
            .repos
            .services()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Service", id))?;
        let car = self.car(&record.car_id).await?;
        if !can_modify(&car, &actor.user_id, actor.is_admin) {
            return Err(DomainError::Forbidden(format!(
                "Not authorized to {} this service",
                verb
            )));
        }
        Ok(record)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        mut dto: UpdateServiceDto,
    ) -> DomainResult<ServiceRecord> {
        self.find_owned(actor, id, "update").await?;
        validate_service_update(&mut dto)?;

        let record = self
            .repos
            .services()
            .update(id, dto)
            .await?
            .ok_or_else(|| DomainError::not_found("Service", id))?;
        info!(service_id = %record.id, "Service record updated");
        Ok(record)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> DomainResult<ServiceRecord> {
        let record = self.find_owned(actor, id, "delete").await?;
        if !self.repos.services().delete(id).await? {
            return Err(DomainError::not_found("Service", id));
        }
        info!(service_id = %record.id, "Service record deleted");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::ServiceType;
    use crate::test_support::TestContext;

    fn dto(car_id: &str, days_ago: i64) -> CreateServiceDto {
        CreateServiceDto {
            car_id: car_id.into(),
            description: format!("Service {days_ago}"),
            cost: 100.0,
            service_type: ServiceType::Repair,
            service_provider: Some("Garage".into()),
            date: Utc::now() - Duration::days(days_ago),
        }
    }

    #[tokio::test]
    async fn history_is_newest_first_and_owner_only() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let stranger = ctx.user("stranger@example.com").await;
        let car_id = ctx.car(&owner).await;
        let services = ctx.state.service_record_service.clone();

        services.create(&owner, dto(&car_id, 10)).await.unwrap();
        services.create(&owner, dto(&car_id, 1)).await.unwrap();

        let history = services.list_for_car(&owner, &car_id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].description, "Service 1");

        assert!(matches!(
            services.list_for_car(&stranger, &car_id).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            services.create(&stranger, dto(&car_id, 0)).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn create_for_missing_car_is_not_found() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let err = ctx
            .state
            .service_record_service
            .create(&owner, dto("missing", 0))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Car not found");
    }

    #[tokio::test]
    async fn update_and_delete_check_the_car_owner() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let stranger = ctx.user("stranger@example.com").await;
        let car_id = ctx.car(&owner).await;
        let services = ctx.state.service_record_service.clone();
        let record = services.create(&owner, dto(&car_id, 0)).await.unwrap();

        let change = UpdateServiceDto {
            cost: Some(20.0),
            ..Default::default()
        };
        assert!(services.update(&stranger, &record.id, change.clone()).await.is_err());
        let updated = services.update(&owner, &record.id, change).await.unwrap();
        assert_eq!(updated.cost, 20.0);
        assert_eq!(updated.service_type, ServiceType::Repair);

        assert!(services.delete(&stranger, &record.id).await.is_err());
        services.delete(&owner, &record.id).await.unwrap();
        assert!(services.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_populates_car() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let car_id = ctx.car(&owner).await;
        let services = ctx.state.service_record_service.clone();
        services.create(&owner, dto(&car_id, 0)).await.unwrap();

        let all = services.list_all().await.unwrap();
        assert_eq!(all[0].car.as_ref().unwrap().id, car_id);

        let other = ctx.user("other@example.com").await;
        assert!(services.list_visible(&other).await.unwrap().is_empty());
        assert_eq!(services.list_visible(&owner).await.unwrap().len(), 1);
    }
}
