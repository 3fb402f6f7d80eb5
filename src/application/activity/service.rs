use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tracing::{debug, warn};

use crate::domain::activity::{Activity, ActivityCount, ActivityFilter, NewActivity};
use crate::domain::{DomainResult, RepositoryProvider};
use crate::shared::PaginatedResult;

const TOP_N: u64 = 5;

#[derive(Debug, Clone)]
pub struct ActivityStats {
    pub total_activities: u64,
    pub today_activities: u64,
    pub top_actions: Vec<ActivityCount>,
    pub top_users: Vec<ActivityCount>,
}

pub struct ActivityService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ActivityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn record(&self, activity: NewActivity) -> DomainResult<Activity> {
        self.repos.activities().record(activity).await
    }

    /// Record as a side effect of another operation. Failures are logged
    /// and swallowed.
    pub async fn record_quietly(&self, activity: NewActivity) {
        let action = activity.action.as_str();
        let entity = activity.entity_type.as_str();
        match self.repos.activities().record(activity).await {
            Ok(saved) => debug!(activity_id = %saved.id, action, entity, "Activity recorded"),
            Err(e) => warn!(action, entity, error = %e, "Failed to record activity"),
        }
    }

    pub async fn list(&self, filter: ActivityFilter) -> DomainResult<PaginatedResult<Activity>> {
        self.repos.activities().list(filter).await
    }

    pub async fn stats(&self) -> DomainResult<ActivityStats> {
        let repo = self.repos.activities();
        let today = Utc::now().date_naive();
        let midnight = Utc.from_utc_datetime(&today.and_hms_opt(0, 0, 0).unwrap_or_default());

        Ok(ActivityStats {
            total_activities: repo.count_all().await?,
            today_activities: repo.count_since(midnight).await?,
            top_actions: repo.top_actions(TOP_N).await?,
            top_users: repo.top_users(TOP_N).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::{ActivityAction, EntityType};
    use crate::test_support::TestContext;

    #[tokio::test]
    async fn stats_rank_actions_and_users() {
        let ctx = TestContext::new().await;
        let activities = ctx.state.activity_service.clone();

        for _ in 0..3 {
            activities
                .record(NewActivity::new(ActivityAction::View, EntityType::Car).by("u1"))
                .await
                .unwrap();
        }
        activities
            .record(NewActivity::new(ActivityAction::Create, EntityType::Car).by("u2"))
            .await
            .unwrap();
        activities
            .record(NewActivity::new(ActivityAction::Login, EntityType::User))
            .await
            .unwrap();

        let stats = activities.stats().await.unwrap();
        assert_eq!(stats.total_activities, 5);
        assert_eq!(stats.today_activities, 5);
        assert_eq!(stats.top_actions[0].key, "view");
        assert_eq!(stats.top_actions[0].count, 3);
        assert_eq!(stats.top_actions.len(), 3);
        // anonymous activity is not counted per user
        assert_eq!(stats.top_users.len(), 2);
        assert_eq!(stats.top_users[0].key, "u1");
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let ctx = TestContext::new().await;
        let activities = ctx.state.activity_service.clone();
        for i in 0..4 {
            let action = if i % 2 == 0 {
                ActivityAction::Create
            } else {
                ActivityAction::Delete
            };
            activities
                .record(NewActivity::new(action, EntityType::Service).entity(format!("s{i}")))
                .await
                .unwrap();
        }

        let page = activities
            .list(ActivityFilter {
                action: Some(ActivityAction::Create),
                page: 1,
                limit: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].action, ActivityAction::Create);
    }
}
