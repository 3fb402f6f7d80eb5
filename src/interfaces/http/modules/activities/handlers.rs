//! Activity handlers
//!
//! Recording is open to any authenticated caller; reading the log is
//! admin-only.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{ActivityDto, ActivityQuery, ActivityStatsDto, RecordActivityRequest};
use crate::application::ActivityService;
use crate::domain::activity::NewActivity;
use crate::interfaces::http::common::{
    ApiError, ApiResponse, PaginatedResponse, RequestMeta, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct ActivityHandlerState {
    pub activities: Arc<ActivityService>,
}

#[utoipa::path(
    post,
    path = "/api/activities",
    tag = "Activities",
    security(("bearer_auth" = [])),
    request_body = RecordActivityRequest,
    responses(
        (status = 201, description = "Activity recorded", body = ApiResponse<ActivityDto>),
        (status = 400, description = "Unknown action or entity type")
    )
)]
pub async fn record_activity(
    State(state): State<ActivityHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    meta: RequestMeta,
    ValidatedJson(request): ValidatedJson<RecordActivityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ActivityDto>>), ApiError> {
    let (action, entity_type) = request.kinds()?;
    let mut activity = NewActivity::new(action, entity_type).by(user.user_id);
    if let Some(id) = request.entity_id {
        activity = activity.entity(id);
    }
    if let Some(details) = request.details {
        activity = activity.details(details);
    }

    let saved = state.activities.record(meta.stamp(activity)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(saved.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/activities",
    tag = "Activities",
    security(("bearer_auth" = [])),
    params(ActivityQuery),
    responses(
        (status = 200, description = "Activities, newest first", body = PaginatedResponse<ActivityDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_activities(
    State(state): State<ActivityHandlerState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<PaginatedResponse<ActivityDto>>, ApiError> {
    let result = state.activities.list(query.into_filter()?).await?;
    Ok(Json(PaginatedResponse::from_result(result, ActivityDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/activities/stats",
    tag = "Activities",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Totals and top actions/users", body = ApiResponse<ActivityStatsDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn activity_stats(
    State(state): State<ActivityHandlerState>,
) -> Result<Json<ApiResponse<ActivityStatsDto>>, ApiError> {
    let stats = state.activities.stats().await?;
    Ok(Json(ApiResponse::success(stats.into())))
}
