use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::fuel::{CreateFuelEntryDto, FuelEntry, FuelEntryRepository, FuelType};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::fuel_entry;

pub struct SeaOrmFuelEntryRepository {
    db: DatabaseConnection,
}

impl SeaOrmFuelEntryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn fuel_type_to_domain(t: fuel_entry::FuelType) -> FuelType {
    match t {
        fuel_entry::FuelType::Gasoline => FuelType::Gasoline,
        fuel_entry::FuelType::Diesel => FuelType::Diesel,
        fuel_entry::FuelType::Electric => FuelType::Electric,
        fuel_entry::FuelType::Hybrid => FuelType::Hybrid,
    }
}

fn fuel_type_to_entity(t: FuelType) -> fuel_entry::FuelType {
    match t {
        FuelType::Gasoline => fuel_entry::FuelType::Gasoline,
        FuelType::Diesel => fuel_entry::FuelType::Diesel,
        FuelType::Electric => fuel_entry::FuelType::Electric,
        FuelType::Hybrid => fuel_entry::FuelType::Hybrid,
    }
}

fn model_to_domain(m: fuel_entry::Model) -> FuelEntry {
    FuelEntry {
        id: m.id,
        car_id: m.car_id,
        date: m.date,
        fuel_amount: m.fuel_amount,
        cost: m.cost,
        mileage: m.mileage,
        fuel_type: fuel_type_to_domain(m.fuel_type),
        notes: m.notes,
        created_by: m.created_by,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

#[async_trait]
impl FuelEntryRepository for SeaOrmFuelEntryRepository {
    async fn list_for_car(&self, car_id: &str) -> DomainResult<Vec<FuelEntry>> {
        let models = fuel_entry::Entity::find()
            .filter(fuel_entry::Column::CarId.eq(car_id))
            .order_by_desc(fuel_entry::Column::Date)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<FuelEntry>> {
        let model = fuel_entry::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn create(&self, dto: CreateFuelEntryDto) -> DomainResult<FuelEntry> {
        let now = Utc::now();
        let model = fuel_entry::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            car_id: Set(dto.car_id),
            date: Set(dto.date),
            fuel_amount: Set(dto.fuel_amount),
            cost: Set(dto.cost),
            mileage: Set(dto.mileage),
            fuel_type: Set(fuel_type_to_entity(dto.fuel_type)),
            notes: Set(dto.notes),
            created_by: Set(dto.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let result = fuel_entry::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
