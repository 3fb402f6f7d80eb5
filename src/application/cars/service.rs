//! Car service: ownership rules, image lifecycle and read models

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::comparison::CarComparison;
use super::qr_summary::QrPayload;
use crate::application::qr::render_svg;
use crate::application::Actor;
use crate::domain::car::{
    can_modify, validate_car_update, validate_new_car, CreateCarDto, UpdateCarDto,
};
use crate::domain::{Car, CarDetails, DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::storage::{ImageError, ImageStore, UploadedImage};

pub struct CarService {
    repos: Arc<dyn RepositoryProvider>,
    images: ImageStore,
    public_base_url: String,
}

/// Failures of car writes that carry an image
#[derive(Debug, thiserror::Error)]
pub enum CarWriteError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl CarService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, images: ImageStore, public_base_url: String) -> Self {
        Self {
            repos,
            images,
            public_base_url,
        }
    }

    // ── Read models ─────────────────────────────────────────────

    /// Attach owners and service history to a batch of cars.
    pub async fn with_details(&self, cars: Vec<Car>) -> DomainResult<Vec<CarDetails>> {
        let car_ids: Vec<String> = cars.iter().map(|c| c.id.clone()).collect();
        let mut owner_ids: Vec<String> = cars.iter().map(|c| c.owner_id.clone()).collect();
        owner_ids.sort();
        owner_ids.dedup();

        let owners: HashMap<String, _> = self
            .repos
            .users()
            .get_users_by_ids(&owner_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u.summary()))
            .collect();

        let mut services_by_car: HashMap<String, Vec<_>> = HashMap::new();
        for service in self.repos.services().list_for_cars(&car_ids).await? {
            services_by_car
                .entry(service.car_id.clone())
                .or_default()
                .push(service);
        }

        Ok(cars
            .into_iter()
            .map(|car| CarDetails {
                owner: owners.get(&car.owner_id).cloned(),
                services: services_by_car.remove(&car.id).unwrap_or_default(),
                car,
            })
            .collect())
    }

    async fn details(&self, car: Car) -> DomainResult<CarDetails> {
        let mut list = self.with_details(vec![car]).await?;
        list.pop()
            .ok_or_else(|| DomainError::Internal("Car details went missing".into()))
    }

    /// Newest first, all owners.
    pub async fn list(&self) -> DomainResult<Vec<CarDetails>> {
        let cars = self.repos.cars().list(None).await?;
        self.with_details(cars).await
    }

    pub async fn list_for_owner(&self, owner_id: &str) -> DomainResult<Vec<CarDetails>> {
        let cars = self.repos.cars().list(Some(owner_id)).await?;
        self.with_details(cars).await
    }

    pub async fn find(&self, id: &str) -> DomainResult<Car> {
        self.repos
            .cars()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Car", id))
    }

    pub async fn get(&self, id: &str) -> DomainResult<CarDetails> {
        let car = self.find(id).await?;
        self.details(car).await
    }

    /// Load a car the actor is allowed to manage. `verb` ends up in the
    /// 403 message ("Not authorized to <verb> this car").
    pub async fn find_owned(&self, actor: &Actor, id: &str, verb: &str) -> DomainResult<Car> {
        let car = self.find(id).await?;
        if !can_modify(&car, &actor.user_id, actor.is_admin) {
            return Err(DomainError::Forbidden(format!(
                "Not authorized to {} this car",
                verb
            )));
        }
        Ok(car)
    }

    // ── Writes ──────────────────────────────────────────────────

    pub async fn create(
        &self,
        actor: &Actor,
        mut dto: CreateCarDto,
        image: Option<UploadedImage>,
    ) -> Result<CarDetails, CarWriteError> {
        dto.owner_id = actor.user_id.clone();
        validate_new_car(&mut dto)?;

        let stored_image = match image {
            Some(image) => Some(self.images.store(image).await?),
            None => None,
        };
        if stored_image.is_some() {
            dto.image = stored_image.clone();
        }

        let car = match self.repos.cars().create(dto).await {
            Ok(car) => car,
            Err(e) => {
                if let Some(reference) = stored_image {
                    self.images.remove(&reference).await;
                }
                return Err(e.into());
            }
        };

        info!(car_id = %car.id, owner_id = %car.owner_id, "Car created");
        Ok(self.details(car).await?)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        mut dto: UpdateCarDto,
        image: Option<UploadedImage>,
    ) -> Result<CarDetails, CarWriteError> {
        let existing = self.find_owned(actor, id, "update").await?;
        validate_car_update(&mut dto)?;

        let stored_image = match image {
            Some(image) => Some(self.images.store(image).await?),
            None => None,
        };
        if stored_image.is_some() {
            dto.image = stored_image.clone();
        }

        let replaced = dto.image.is_some() && dto.image != existing.image;
        let updated = match self.repos.cars().update(id, dto).await {
            Ok(Some(car)) => car,
            Ok(None) => return Err(DomainError::not_found("Car", id).into()),
            Err(e) => {
                if let Some(reference) = stored_image {
                    self.images.remove(&reference).await;
                }
                return Err(e.into());
            }
        };

        if replaced {
            if let Some(old) = existing.image.as_deref() {
                self.images.remove(old).await;
            }
        }

        info!(car_id = %updated.id, "Car updated");
        Ok(self.details(updated).await?)
    }

    /// Delete a car together with its services and fuel entries.
    pub async fn delete(&self, actor: &Actor, id: &str) -> DomainResult<Car> {
        let car = self.find_owned(actor, id, "delete").await?;
        if !self.repos.cars().delete_cascade(id).await? {
            return Err(DomainError::not_found("Car", id));
        }
        if let Some(image) = car.image.as_deref() {
            self.images.remove(image).await;
        }
        info!(car_id = %car.id, "Car deleted");
        Ok(car)
    }

    // ── Derived views ───────────────────────────────────────────

    pub async fn compare(&self, first_id: &str, second_id: &str) -> DomainResult<CarComparison> {
        if first_id == second_id {
            warn!(car_id = first_id, "Comparing a car with itself");
        }
        let first = self.get(first_id).await?;
        let second = self.get(second_id).await?;
        Ok(CarComparison::new(first, second))
    }

    pub async fn qr_payload(&self, id: &str) -> DomainResult<QrPayload> {
        let details = self.get(id).await?;
        Ok(QrPayload::new(
            &details,
            &self.public_base_url,
            chrono::Utc::now(),
        ))
    }

    pub async fn qr_svg(&self, id: &str) -> DomainResult<String> {
        let payload = self.qr_payload(id).await?;
        let json = serde_json::to_string(&payload)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        render_svg(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service_record::{CreateServiceDto, ServiceType};
    use crate::infrastructure::storage::PUBLIC_PREFIX;
    use crate::test_support::TestContext;

    fn new_car() -> CreateCarDto {
        CreateCarDto {
            brand: "Toyota".into(),
            model: "Camry".into(),
            year: 2020,
            price: 25000.0,
            mileage: Some(35000),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_populates_owner_and_lists_newest_first() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let cars = ctx.state.car_service.clone();

        let first = cars.create(&owner, new_car(), None).await.unwrap();
        assert_eq!(first.owner.as_ref().unwrap().id, owner.user_id);
        assert!(first.services.is_empty());

        let mut second = new_car();
        second.brand = "Honda".into();
        cars.create(&owner, second, None).await.unwrap();

        let listed = cars.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].car.brand, "Honda");
        assert_eq!(cars.list_for_owner("nobody").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn only_owner_or_admin_may_modify() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let stranger = ctx.user("stranger@example.com").await;
        let admin = ctx.admin("root@example.com").await;
        let cars = ctx.state.car_service.clone();

        let car = cars.create(&owner, new_car(), None).await.unwrap().car;

        let err = cars.delete(&stranger, &car.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Not authorized to delete this car");

        let update = UpdateCarDto {
            price: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(
            cars.update(&stranger, &car.id, update.clone(), None).await,
            Err(CarWriteError::Domain(DomainError::Forbidden(_)))
        ));
        let updated = cars.update(&admin, &car.id, update, None).await.unwrap();
        assert_eq!(updated.car.price, 1.0);
        assert_eq!(updated.car.brand, "Toyota");
    }

    #[tokio::test]
    async fn delete_removes_services() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let cars = ctx.state.car_service.clone();
        let car = cars.create(&owner, new_car(), None).await.unwrap().car;

        ctx.repos
            .services()
            .create(CreateServiceDto {
                car_id: car.id.clone(),
                description: "Oil change".into(),
                cost: 75.0,
                service_type: ServiceType::Maintenance,
                service_provider: None,
                date: chrono::Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(cars.get(&car.id).await.unwrap().services.len(), 1);

        cars.delete(&owner, &car.id).await.unwrap();
        assert!(matches!(
            cars.get(&car.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(ctx.repos.services().list_for_car(&car.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_car_is_rejected_before_insert() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let mut dto = new_car();
        dto.year = 1800;
        assert!(ctx.state.car_service.create(&owner, dto, None).await.is_err());
        assert!(ctx.state.car_service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn foreign_upload_reference_cannot_be_claimed() {
        let ctx = TestContext::new().await;
        let root = std::env::temp_dir().join(format!("car-service-{}", uuid::Uuid::new_v4()));
        let images = ImageStore::new(&crate::config::UploadsConfig {
            dir: root.clone(),
            max_image_bytes: 1024,
            mode: crate::config::UploadMode::Disk,
        });
        let cars = CarService::new(ctx.repos.clone(), images, "http://cars.test".into());
        let victim = ctx.user("victim@example.com").await;
        let attacker = ctx.user("attacker@example.com").await;

        let upload = UploadedImage {
            content_type: "image/png".into(),
            file_name: Some("car.png".into()),
            bytes: b"png".to_vec(),
        };
        let victim_car = cars.create(&victim, new_car(), Some(upload)).await.unwrap().car;
        let reference = victim_car.image.clone().unwrap();
        let path = root.join("cars").join(reference.trim_start_matches(PUBLIC_PREFIX));
        assert!(path.exists());

        let mut claim = new_car();
        claim.image = Some(reference.clone());
        assert!(matches!(
            cars.create(&attacker, claim, None).await,
            Err(CarWriteError::Domain(DomainError::Validation(_)))
        ));

        let own = cars.create(&attacker, new_car(), None).await.unwrap().car;
        let update = UpdateCarDto {
            image: Some(reference.clone()),
            ..Default::default()
        };
        assert!(cars.update(&attacker, &own.id, update, None).await.is_err());
        cars.delete(&attacker, &own.id).await.unwrap();

        assert!(path.exists());
        assert_eq!(cars.get(&victim_car.id).await.unwrap().car.image, Some(reference));
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn qr_payload_and_svg() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let cars = ctx.state.car_service.clone();
        let car = cars.create(&owner, new_car(), None).await.unwrap().car;

        let payload = cars.qr_payload(&car.id).await.unwrap();
        assert!(payload.car_url.ends_with(&format!("/cars/{}", car.id)));
        assert_eq!(payload.owner.unwrap().email, "owner@example.com");
        assert!(cars.qr_svg(&car.id).await.unwrap().contains("<svg"));
    }
}
