//! Service record handlers
//!
//! Ownership is checked against the car a record belongs to.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;

use super::dto::{CreateServiceRequest, ServiceDto, ServiceWithCarDto, UpdateServiceRequest};
use crate::application::{ActivityService, ServiceRecordService};
use crate::domain::activity::{ActivityAction, EntityType, NewActivity};
use crate::interfaces::http::common::{ApiError, ApiResponse, RequestMeta, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct ServiceHandlerState {
    pub services: Arc<ServiceRecordService>,
    pub activities: Arc<ActivityService>,
}

#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Services",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every service record with its car", body = ApiResponse<Vec<ServiceWithCarDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_all_services(
    State(state): State<ServiceHandlerState>,
) -> Result<Json<ApiResponse<Vec<ServiceWithCarDto>>>, ApiError> {
    let records = state.services.list_all().await?;
    Ok(Json(ApiResponse::list(
        records.into_iter().map(ServiceWithCarDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Services",
    security(("bearer_auth" = [])),
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service record created", body = ApiResponse<ServiceDto>),
        (status = 403, description = "Not the car's owner"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn create_service(
    State(state): State<ServiceHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    meta: RequestMeta,
    ValidatedJson(request): ValidatedJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceDto>>), ApiError> {
    let record = state
        .services
        .create(&user.actor(), request.into_dto()?)
        .await?;

    state
        .activities
        .record_quietly(meta.stamp(
            NewActivity::new(ActivityAction::Create, EntityType::Service)
                .entity(record.id.clone())
                .by(user.user_id.clone())
                .details(json!({ "car_id": record.car_id, "cost": record.cost })),
        ))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Service record created successfully",
            record.into(),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/services/{car_id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("car_id" = String, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Service history, newest first", body = ApiResponse<Vec<ServiceDto>>),
        (status = 403, description = "Not the car's owner"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn list_car_services(
    State(state): State<ServiceHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(car_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ServiceDto>>>, ApiError> {
    let records = state.services.list_for_car(&user.actor(), &car_id).await?;
    Ok(Json(ApiResponse::list(
        records.into_iter().map(ServiceDto::from).collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service record ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service record updated", body = ApiResponse<ServiceDto>),
        (status = 403, description = "Not the car's owner"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn update_service(
    State(state): State<ServiceHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    meta: RequestMeta,
    ValidatedJson(request): ValidatedJson<UpdateServiceRequest>,
) -> Result<Json<ApiResponse<ServiceDto>>, ApiError> {
    let record = state
        .services
        .update(&user.actor(), &id, request.into_dto()?)
        .await?;

    state
        .activities
        .record_quietly(meta.stamp(
            NewActivity::new(ActivityAction::Update, EntityType::Service)
                .entity(record.id.clone())
                .by(user.user_id.clone()),
        ))
        .await;

    Ok(Json(ApiResponse::with_message(
        "Service record updated successfully",
        record.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service record ID")),
    responses(
        (status = 200, description = "Service record deleted"),
        (status = 403, description = "Not the car's owner"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn delete_service(
    State(state): State<ServiceHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    meta: RequestMeta,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let record = state.services.delete(&user.actor(), &id).await?;

    state
        .activities
        .record_quietly(meta.stamp(
            NewActivity::new(ActivityAction::Delete, EntityType::Service)
                .entity(record.id.clone())
                .by(user.user_id.clone())
                .details(json!({ "car_id": record.car_id })),
        ))
        .await;

    Ok(Json(ApiResponse::message(
        "Service record deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::interfaces::http::router::create_router;
    use crate::test_support::TestContext;

    use super::*;

    async fn send(
        ctx: &TestContext,
        method: &str,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token));
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();
        let res = create_router(ctx.state.clone()).oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn only_the_car_owner_may_edit_its_services() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let car_id = ctx.car(&owner).await;
        let owner_token = ctx.login("owner@example.com").await;
        let stranger_token = ctx.token("stranger@example.com").await;

        let (status, body) = send(
            &ctx,
            "POST",
            "/api/services",
            &owner_token,
            Some(json!({ "car": car_id, "description": "Oil change", "cost": 80 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["car"], car_id.as_str());
        let service_uri = format!("/api/services/{}", body["data"]["id"].as_str().unwrap());

        let (status, body) = send(&ctx, "PUT", &service_uri, &stranger_token, Some(json!({ "cost": 1 }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Not authorized to update this service");

        let (status, body) = send(&ctx, "PUT", &service_uri, &owner_token, Some(json!({ "cost": 95 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["cost"], 95.0);

        let (status, body) = send(&ctx, "GET", &format!("/api/services/{}", car_id), &owner_token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);

        let (status, _) = send(&ctx, "GET", "/api/services", &owner_token, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
