use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::ActivityStats;
use crate::domain::activity::{Activity, ActivityAction, ActivityCount, ActivityFilter, EntityType};
use crate::interfaces::http::common::ApiError;
use crate::shared::validate_pagination;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityDto {
    pub id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub user_id: Option<String>,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
    pub user_agent: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Activity> for ActivityDto {
    fn from(a: Activity) -> Self {
        Self {
            id: a.id,
            action: a.action.as_str().to_string(),
            entity_type: a.entity_type.as_str().to_string(),
            entity_id: a.entity_id,
            user_id: a.user_id,
            details: a.details,
            user_agent: a.user_agent,
            url: a.url,
            created_at: a.created_at,
        }
    }
}

fn parse_action(s: &str) -> Result<ActivityAction, ApiError> {
    s.parse::<ActivityAction>()
        .map_err(|_| ApiError::bad_request(format!("Invalid action '{}'", s)))
}

fn parse_entity_type(s: &str) -> Result<EntityType, ApiError> {
    s.parse::<EntityType>()
        .map_err(|_| ApiError::bad_request(format!("Invalid entity type '{}'", s)))
}

/// Client-reported activity
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordActivityRequest {
    #[validate(length(min = 1, message = "Action is required"))]
    pub action: String,
    #[validate(length(min = 1, message = "Entity type is required"))]
    pub entity_type: String,
    pub entity_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl RecordActivityRequest {
    pub fn kinds(&self) -> Result<(ActivityAction, EntityType), ApiError> {
        Ok((parse_action(&self.action)?, parse_entity_type(&self.entity_type)?))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ActivityQuery {
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub user_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ActivityQuery {
    pub fn into_filter(self) -> Result<ActivityFilter, ApiError> {
        let (page, limit) = validate_pagination(self.page, self.limit);
        Ok(ActivityFilter {
            action: self.action.as_deref().map(parse_action).transpose()?,
            entity_type: self.entity_type.as_deref().map(parse_entity_type).transpose()?,
            user_id: self.user_id.filter(|u| !u.is_empty()),
            page,
            limit,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActionCountDto {
    pub action: String,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserCountDto {
    pub user_id: String,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityStatsDto {
    pub total_activities: u64,
    pub today_activities: u64,
    pub top_actions: Vec<ActionCountDto>,
    pub top_users: Vec<UserCountDto>,
}

impl From<ActivityStats> for ActivityStatsDto {
    fn from(s: ActivityStats) -> Self {
        Self {
            total_activities: s.total_activities,
            today_activities: s.today_activities,
            top_actions: s
                .top_actions
                .into_iter()
                .map(|ActivityCount { key, count }| ActionCountDto { action: key, count })
                .collect(),
            top_users: s
                .top_users
                .into_iter()
                .map(|ActivityCount { key, count }| UserCountDto { user_id: key, count })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults_and_clamps() {
        let filter = ActivityQuery {
            limit: Some(10_000),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 100);
        assert!(filter.action.is_none());
    }

    #[test]
    fn unknown_action_is_rejected() {
        let query = ActivityQuery {
            action: Some("teleport".into()),
            ..Default::default()
        };
        assert!(query.into_filter().is_err());
    }

    #[test]
    fn stats_keys_are_renamed_per_list() {
        let dto = ActivityStatsDto::from(ActivityStats {
            total_activities: 3,
            today_activities: 1,
            top_actions: vec![ActivityCount {
                key: "create".into(),
                count: 2,
            }],
            top_users: vec![ActivityCount {
                key: "u1".into(),
                count: 3,
            }],
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["top_actions"][0]["action"], "create");
        assert_eq!(json["top_users"][0]["user_id"], "u1");
        assert_eq!(json["top_users"][0]["count"], 3);
    }
}
