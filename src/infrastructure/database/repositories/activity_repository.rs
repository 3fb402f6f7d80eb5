use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::activity::{
    Activity, ActivityAction, ActivityCount, ActivityFilter, ActivityRepository, EntityType,
    NewActivity,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::activity;
use crate::shared::PaginatedResult;

pub struct SeaOrmActivityRepository {
    db: DatabaseConnection,
}

impl SeaOrmActivityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct GroupCount {
    key: String,
    total: i64,
}

fn model_to_domain(m: activity::Model) -> DomainResult<Activity> {
    let action = m.action.parse::<ActivityAction>().map_err(|_| {
        DomainError::Internal(format!("Unknown activity action '{}'", m.action))
    })?;
    let entity_type = m.entity_type.parse::<EntityType>().map_err(|_| {
        DomainError::Internal(format!("Unknown activity entity type '{}'", m.entity_type))
    })?;
    Ok(Activity {
        id: m.id,
        action,
        entity_type,
        entity_id: m.entity_id,
        user_id: m.user_id,
        details: serde_json::from_str(&m.details)
            .unwrap_or_else(|_| serde_json::Value::Object(Default::default())),
        user_agent: m.user_agent,
        url: m.url,
        created_at: m.created_at,
    })
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

impl SeaOrmActivityRepository {
    async fn top_by(
        &self,
        column: activity::Column,
        limit: u64,
        skip_null: bool,
    ) -> DomainResult<Vec<ActivityCount>> {
        let mut query = activity::Entity::find()
            .select_only()
            .column_as(column, "key")
            .column_as(Expr::col(activity::Column::Id).count(), "total")
            .group_by(column);
        if skip_null {
            query = query.filter(column.is_not_null());
        }
        let rows = query
            .order_by(Expr::cust("total"), Order::Desc)
            .order_by_asc(column)
            .limit(limit)
            .into_model::<GroupCount>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| ActivityCount {
                key: r.key,
                count: r.total.max(0) as u64,
            })
            .collect())
    }
}

#[async_trait]
impl ActivityRepository for SeaOrmActivityRepository {
    async fn record(&self, a: NewActivity) -> DomainResult<Activity> {
        let model = activity::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            action: Set(a.action.as_str().to_string()),
            entity_type: Set(a.entity_type.as_str().to_string()),
            entity_id: Set(a.entity_id),
            user_id: Set(a.user_id),
            details: Set(a.details.to_string()),
            user_agent: Set(a.user_agent),
            url: Set(a.url),
            created_at: Set(Utc::now()),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn list(&self, filter: ActivityFilter) -> DomainResult<PaginatedResult<Activity>> {
        let page = filter.page.max(1);
        let limit = filter.limit.max(1);

        let mut query = activity::Entity::find();
        if let Some(action) = filter.action {
            query = query.filter(activity::Column::Action.eq(action.as_str()));
        }
        if let Some(entity_type) = filter.entity_type {
            query = query.filter(activity::Column::EntityType.eq(entity_type.as_str()));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(activity::Column::UserId.eq(user_id));
        }
        query = query.order_by_desc(activity::Column::CreatedAt);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .offset(((page - 1) * limit) as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(PaginatedResult::new(items, total, page, limit))
    }

    async fn count_all(&self) -> DomainResult<u64> {
        activity::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        activity::Entity::find()
            .filter(activity::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn top_actions(&self, limit: u64) -> DomainResult<Vec<ActivityCount>> {
        self.top_by(activity::Column::Action, limit, false).await
    }

    async fn top_users(&self, limit: u64) -> DomainResult<Vec<ActivityCount>> {
        self.top_by(activity::Column::UserId, limit, true).await
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let result = activity::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
