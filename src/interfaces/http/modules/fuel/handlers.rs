use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;

use super::dto::{CreateFuelEntryRequest, FuelEntryDto, FuelStatsDto};
use crate::application::{ActivityService, FuelService};
use crate::domain::activity::{ActivityAction, EntityType, NewActivity};
use crate::interfaces::http::common::{ApiError, ApiResponse, RequestMeta, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct FuelHandlerState {
    pub fuel: Arc<FuelService>,
    pub activities: Arc<ActivityService>,
}

#[utoipa::path(
    get,
    path = "/api/cars/{id}/fuel-entries",
    tag = "Fuel",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Fuel entries, newest first", body = ApiResponse<Vec<FuelEntryDto>>),
        (status = 403, description = "Not the car's owner"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn list_fuel_entries(
    State(state): State<FuelHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(car_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<FuelEntryDto>>>, ApiError> {
    let entries = state.fuel.list(&user.actor(), &car_id).await?;
    Ok(Json(ApiResponse::list(
        entries.into_iter().map(FuelEntryDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/cars/{id}/fuel-entries",
    tag = "Fuel",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Car ID")),
    request_body = CreateFuelEntryRequest,
    responses(
        (status = 201, description = "Fuel entry added", body = ApiResponse<FuelEntryDto>),
        (status = 403, description = "Not the car's owner"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn add_fuel_entry(
    State(state): State<FuelHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(car_id): Path<String>,
    meta: RequestMeta,
    ValidatedJson(request): ValidatedJson<CreateFuelEntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FuelEntryDto>>), ApiError> {
    let entry = state
        .fuel
        .add(&user.actor(), request.into_dto(car_id)?)
        .await?;

    state
        .activities
        .record_quietly(meta.stamp(
            NewActivity::new(ActivityAction::Create, EntityType::FuelEntry)
                .entity(entry.id.clone())
                .by(user.user_id.clone())
                .details(json!({ "car_id": entry.car_id, "fuel_amount": entry.fuel_amount })),
        ))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Fuel entry added", entry.into())),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/cars/{id}/fuel-entries/{entry_id}",
    tag = "Fuel",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Car ID"),
        ("entry_id" = String, Path, description = "Fuel entry ID")
    ),
    responses(
        (status = 200, description = "Fuel entry deleted"),
        (status = 404, description = "Fuel entry not found")
    )
)]
pub async fn delete_fuel_entry(
    State(state): State<FuelHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((car_id, entry_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .fuel
        .delete(&user.actor(), &car_id, &entry_id)
        .await?;
    Ok(Json(ApiResponse::message("Fuel entry deleted")))
}

#[utoipa::path(
    get,
    path = "/api/cars/{id}/fuel-entries/stats",
    tag = "Fuel",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Efficiency and cost statistics", body = ApiResponse<FuelStatsDto>),
        (status = 403, description = "Not the car's owner")
    )
)]
pub async fn fuel_stats(
    State(state): State<FuelHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(car_id): Path<String>,
) -> Result<Json<ApiResponse<FuelStatsDto>>, ApiError> {
    let stats = state.fuel.stats(&user.actor(), &car_id).await?;
    Ok(Json(ApiResponse::success(stats.into())))
}
