use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::service_record::{
    CreateServiceDto, ServiceRecord, ServiceRecordRepository, ServiceType, UpdateServiceDto,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::service;

pub struct SeaOrmServiceRecordRepository {
    db: DatabaseConnection,
}

impl SeaOrmServiceRecordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn type_to_domain(t: service::ServiceType) -> ServiceType {
    match t {
        service::ServiceType::Maintenance => ServiceType::Maintenance,
        service::ServiceType::Repair => ServiceType::Repair,
        service::ServiceType::Inspection => ServiceType::Inspection,
        service::ServiceType::Other => ServiceType::Other,
    }
}

fn type_to_entity(t: ServiceType) -> service::ServiceType {
    match t {
        ServiceType::Maintenance => service::ServiceType::Maintenance,
        ServiceType::Repair => service::ServiceType::Repair,
        ServiceType::Inspection => service::ServiceType::Inspection,
        ServiceType::Other => service::ServiceType::Other,
    }
}

fn model_to_domain(m: service::Model) -> ServiceRecord {
    ServiceRecord {
        id: m.id,
        car_id: m.car_id,
        description: m.description,
        cost: m.cost,
        service_type: type_to_domain(m.service_type),
        service_provider: m.service_provider,
        date: m.date,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

#[async_trait]
impl ServiceRecordRepository for SeaOrmServiceRecordRepository {
    async fn list_all(&self) -> DomainResult<Vec<ServiceRecord>> {
        let models = service::Entity::find()
            .order_by_desc(service::Column::Date)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn list_for_car(&self, car_id: &str) -> DomainResult<Vec<ServiceRecord>> {
        let models = service::Entity::find()
            .filter(service::Column::CarId.eq(car_id))
            .order_by_desc(service::Column::Date)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn list_for_cars(&self, car_ids: &[String]) -> DomainResult<Vec<ServiceRecord>> {
        if car_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = service::Entity::find()
            .filter(service::Column::CarId.is_in(car_ids.iter().cloned()))
            .order_by_desc(service::Column::Date)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceRecord>> {
        let model = service::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn create(&self, dto: CreateServiceDto) -> DomainResult<ServiceRecord> {
        let now = Utc::now();
        let model = service::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            car_id: Set(dto.car_id),
            description: Set(dto.description),
            cost: Set(dto.cost),
            service_type: Set(type_to_entity(dto.service_type)),
            service_provider: Set(dto.service_provider),
            date: Set(dto.date),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn update(
        &self,
        id: &str,
        dto: UpdateServiceDto,
    ) -> DomainResult<Option<ServiceRecord>> {
        let Some(existing) = service::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let mut active: service::ActiveModel = existing.into();
        if let Some(description) = dto.description {
            active.description = Set(description);
        }
        if let Some(cost) = dto.cost {
            active.cost = Set(cost);
        }
        if let Some(service_type) = dto.service_type {
            active.service_type = Set(type_to_entity(service_type));
        }
        if let Some(provider) = dto.service_provider {
            active.service_provider = Set(Some(provider).filter(|p| !p.is_empty()));
        }
        if let Some(date) = dto.date {
            active.date = Set(date);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(model_to_domain(updated)))
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let result = service::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
