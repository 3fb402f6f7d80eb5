//! Car handlers
//!
//! Listing, details, comparison and QR codes are public. Writes require a
//! token and are restricted to the owner or an admin.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;

use super::dto::{CarComparisonDto, CarDto, CompareParams, QrParams};
use super::form::{CarFields, CarForm};
use crate::application::cars::QrPayload;
use crate::application::{ActivityService, CarService};
use crate::domain::activity::{ActivityAction, EntityType, NewActivity};
use crate::interfaces::http::common::{ApiError, ApiResponse, RequestMeta};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct CarHandlerState {
    pub cars: Arc<CarService>,
    pub activities: Arc<ActivityService>,
}

#[utoipa::path(
    get,
    path = "/api/cars",
    tag = "Cars",
    responses(
        (status = 200, description = "Every car with owner and services", body = ApiResponse<Vec<CarDto>>)
    )
)]
pub async fn list_cars(
    State(state): State<CarHandlerState>,
) -> Result<Json<ApiResponse<Vec<CarDto>>>, ApiError> {
    let cars = state.cars.list().await?;
    Ok(Json(ApiResponse::list(
        cars.into_iter().map(CarDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/cars/my-cars",
    tag = "Cars",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cars owned by the caller", body = ApiResponse<Vec<CarDto>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_cars(
    State(state): State<CarHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<CarDto>>>, ApiError> {
    let cars = state.cars.list_for_owner(&user.user_id).await?;
    Ok(Json(ApiResponse::list(
        cars.into_iter().map(CarDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/cars/{id}",
    tag = "Cars",
    params(("id" = String, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car details", body = ApiResponse<CarDto>),
        (status = 404, description = "Car not found")
    )
)]
pub async fn get_car(
    State(state): State<CarHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CarDto>>, ApiError> {
    let car = state.cars.get(&id).await?;
    Ok(Json(ApiResponse::success(car.into())))
}

#[utoipa::path(
    post,
    path = "/api/cars",
    tag = "Cars",
    security(("bearer_auth" = [])),
    request_body(content = CarFields, description = "JSON or multipart/form-data with an optional `image` file"),
    responses(
        (status = 201, description = "Car created", body = ApiResponse<CarDto>),
        (status = 400, description = "Invalid car data or image"),
        (status = 413, description = "Image too large")
    )
)]
pub async fn create_car(
    State(state): State<CarHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    meta: RequestMeta,
    form: CarForm,
) -> Result<(StatusCode, Json<ApiResponse<CarDto>>), ApiError> {
    let dto = form.fields.into_create()?;
    let car = state.cars.create(&user.actor(), dto, form.image).await?;

    state
        .activities
        .record_quietly(meta.stamp(
            NewActivity::new(ActivityAction::Create, EntityType::Car)
                .entity(car.car.id.clone())
                .by(user.user_id.clone())
                .details(json!({ "brand": car.car.brand, "model": car.car.model })),
        ))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Car created successfully", car.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/cars/{id}",
    tag = "Cars",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Car ID")),
    request_body(content = CarFields, description = "Fields to change; JSON or multipart/form-data"),
    responses(
        (status = 200, description = "Car updated", body = ApiResponse<CarDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn update_car(
    State(state): State<CarHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    meta: RequestMeta,
    form: CarForm,
) -> Result<Json<ApiResponse<CarDto>>, ApiError> {
    let car = state
        .cars
        .update(&user.actor(), &id, form.fields.into_update(), form.image)
        .await?;

    state
        .activities
        .record_quietly(meta.stamp(
            NewActivity::new(ActivityAction::Update, EntityType::Car)
                .entity(car.car.id.clone())
                .by(user.user_id.clone()),
        ))
        .await;

    Ok(Json(ApiResponse::with_message(
        "Car updated successfully",
        car.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/cars/{id}",
    tag = "Cars",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car and its history deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn delete_car(
    State(state): State<CarHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    meta: RequestMeta,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let car = state.cars.delete(&user.actor(), &id).await?;

    state
        .activities
        .record_quietly(meta.stamp(
            NewActivity::new(ActivityAction::Delete, EntityType::Car)
                .entity(car.id.clone())
                .by(user.user_id.clone())
                .details(json!({ "brand": car.brand, "model": car.model })),
        ))
        .await;

    Ok(Json(ApiResponse::message("Car deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/cars/compare",
    tag = "Cars",
    params(CompareParams),
    responses(
        (status = 200, description = "Side-by-side comparison", body = ApiResponse<CarComparisonDto>),
        (status = 400, description = "Both car IDs are required"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn compare_cars(
    State(state): State<CarHandlerState>,
    Query(params): Query<CompareParams>,
) -> Result<Json<ApiResponse<CarComparisonDto>>, ApiError> {
    let (Some(first), Some(second)) = (params.first, params.second) else {
        return Err(ApiError::bad_request(
            "Two car IDs are required for comparison",
        ));
    };
    let comparison = state.cars.compare(&first, &second).await?;
    Ok(Json(ApiResponse::success(comparison.into())))
}

#[utoipa::path(
    get,
    path = "/api/cars/{id}/qr",
    tag = "Cars",
    params(
        ("id" = String, Path, description = "Car ID"),
        QrParams
    ),
    responses(
        (status = 200, description = "QR code (SVG) or the payload it encodes (JSON)"),
        (status = 400, description = "Unknown format"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn car_qr(
    State(state): State<CarHandlerState>,
    Path(id): Path<String>,
    Query(params): Query<QrParams>,
) -> Result<Response, ApiError> {
    match params.format.as_deref().unwrap_or("svg") {
        "svg" => {
            let svg = state.cars.qr_svg(&id).await?;
            Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
        }
        "json" => {
            let payload: QrPayload = state.cars.qr_payload(&id).await?;
            Ok(Json(ApiResponse::success(payload)).into_response())
        }
        other => Err(ApiError::bad_request(format!(
            "Unsupported QR format '{}', use svg or json",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::interfaces::http::router::create_router;
    use crate::test_support::TestContext;

    use super::*;

    async fn send(ctx: &TestContext, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let res = create_router(ctx.state.clone()).oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_returns_201_with_owner() {
        let ctx = TestContext::new().await;
        let token = ctx.token("owner@example.com").await;

        let (status, body) = send(
            &ctx,
            json_request(
                "POST",
                "/api/cars",
                &token,
                json!({ "brand": "Toyota", "model": "Camry", "year": 2020, "price": 25000 }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Car created successfully");
        assert_eq!(body["data"]["owner"]["email"], "owner@example.com");
        assert_eq!(body["data"]["services"], json!([]));
    }

    #[tokio::test]
    async fn invalid_year_is_400() {
        let ctx = TestContext::new().await;
        let token = ctx.token("owner@example.com").await;

        let (status, body) = send(
            &ctx,
            json_request(
                "POST",
                "/api/cars",
                &token,
                json!({ "brand": "Ford", "model": "T", "year": 1800, "price": 100 }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn upload_paths_in_body_are_rejected() {
        let ctx = TestContext::new().await;
        let token = ctx.token("owner@example.com").await;

        let (status, body) = send(
            &ctx,
            json_request(
                "POST",
                "/api/cars",
                &token,
                json!({
                    "brand": "Ford",
                    "model": "Focus",
                    "year": 2015,
                    "price": 9000,
                    "image": "/uploads/cars/car-1-2.png"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Image must be an http(s) URL or a data:image URI");
    }

    #[tokio::test]
    async fn strangers_cannot_delete() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let car_id = ctx.car(&owner).await;
        let stranger = ctx.token("stranger@example.com").await;

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/cars/{}", car_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", stranger))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&ctx, req).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Not authorized to delete this car");
    }

    #[tokio::test]
    async fn listing_is_public() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        ctx.car(&owner).await;

        let req = Request::get("/api/cars").body(Body::empty()).unwrap();
        let (status, body) = send(&ctx, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn compare_requires_both_ids() {
        let ctx = TestContext::new().await;
        let req = Request::get("/api/cars/compare?first=abc")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&ctx, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn qr_svg_has_image_content_type() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let car_id = ctx.car(&owner).await;

        let res = create_router(ctx.state.clone())
            .oneshot(
                Request::get(format!("/api/cars/{}/qr", car_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "image/svg+xml");
    }
}
