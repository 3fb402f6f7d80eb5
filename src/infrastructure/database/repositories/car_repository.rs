use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::car::{Car, CarRepository, CreateCarDto, UpdateCarDto};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{car, fuel_entry, service};

pub struct SeaOrmCarRepository {
    db: DatabaseConnection,
}

impl SeaOrmCarRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: car::Model) -> Car {
    Car {
        id: m.id,
        brand: m.brand,
        model: m.model,
        year: m.year,
        price: m.price,
        color: m.color,
        mileage: m.mileage,
        description: m.description,
        image: m.image,
        owner_id: m.owner_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

#[async_trait]
impl CarRepository for SeaOrmCarRepository {
    async fn list(&self, owner_id: Option<&str>) -> DomainResult<Vec<Car>> {
        let mut query = car::Entity::find();
        if let Some(owner_id) = owner_id {
            query = query.filter(car::Column::OwnerId.eq(owner_id));
        }
        let models = query
            .order_by_desc(car::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Car>> {
        let model = car::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Car>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = car::Entity::find()
            .filter(car::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn create(&self, dto: CreateCarDto) -> DomainResult<Car> {
        let now = Utc::now();
        let model = car::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            brand: Set(dto.brand),
            model: Set(dto.model),
            year: Set(dto.year),
            price: Set(dto.price),
            color: Set(dto.color),
            mileage: Set(dto.mileage),
            description: Set(dto.description),
            image: Set(dto.image),
            owner_id: Set(dto.owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn update(&self, id: &str, dto: UpdateCarDto) -> DomainResult<Option<Car>> {
        let Some(existing) = car::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let mut active: car::ActiveModel = existing.into();
        if let Some(brand) = dto.brand {
            active.brand = Set(brand);
        }
        if let Some(model) = dto.model {
            active.model = Set(model);
        }
        if let Some(year) = dto.year {
            active.year = Set(year);
        }
        if let Some(price) = dto.price {
            active.price = Set(price);
        }
        if let Some(color) = dto.color {
            active.color = Set(Some(color).filter(|c| !c.is_empty()));
        }
        if let Some(mileage) = dto.mileage {
            active.mileage = Set(Some(mileage));
        }
        if let Some(description) = dto.description {
            active.description = Set(Some(description));
        }
        if let Some(image) = dto.image {
            active.image = Set(Some(image));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(model_to_domain(updated)))
    }

    async fn delete_cascade(&self, id: &str) -> DomainResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        service::Entity::delete_many()
            .filter(service::Column::CarId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        fuel_entry::Entity::delete_many()
            .filter(fuel_entry::Column::CarId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = car::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Ok(false);
        }

        txn.commit().await.map_err(db_err)?;
        Ok(true)
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let txn = self.db.begin().await.map_err(db_err)?;
        service::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        fuel_entry::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = car::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
