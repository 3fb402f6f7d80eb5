//! User API handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;

use super::dto::{
    AuthResponse, ListUsersParams, LoginRequest, RegisterRequest, UpdateProfileRequest, UserDto,
};
use crate::application::identity::ProfileUpdate;
use crate::application::{ActivityService, UserService};
use crate::domain::activity::{ActivityAction, EntityType, NewActivity};
use crate::domain::user::GetUserDto;
use crate::interfaces::http::common::{
    ApiError, ApiResponse, PaginatedResponse, RequestMeta, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct UserHandlerState {
    pub users: Arc<UserService>,
    pub activities: Arc<ActivityService>,
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Validation error or duplicate email")
    )
)]
pub async fn register(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let result = state
        .users
        .register(&request.name, &request.email, &request.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User registered successfully",
            result.into(),
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials or second factor required")
    )
)]
pub async fn login(
    State(state): State<UserHandlerState>,
    meta: RequestMeta,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let result = state
        .users
        .login(
            &request.email,
            &request.password,
            request.two_factor_code.as_deref(),
        )
        .await?;

    state
        .activities
        .record_quietly(meta.stamp(
            NewActivity::new(ActivityAction::Login, EntityType::User)
                .entity(result.user.id.clone())
                .by(result.user.id.clone()),
        ))
        .await;

    Ok(Json(ApiResponse::with_message(
        "Login successful",
        result.into(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDto>),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn get_profile(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let profile = state.users.get_profile(&user.user_id).await?;
    Ok(Json(ApiResponse::success(profile.into())))
}

#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated, fresh token issued", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Validation error")
    )
)]
pub async fn update_profile(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    meta: RequestMeta,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let changed: Vec<&str> = [
        request.name.as_ref().map(|_| "name"),
        request.email.as_ref().map(|_| "email"),
        request.password.as_ref().map(|_| "password"),
    ]
    .into_iter()
    .flatten()
    .collect();

    let result = state
        .users
        .update_profile(
            &user.user_id,
            ProfileUpdate {
                name: request.name,
                email: request.email,
                password: request.password,
            },
        )
        .await?;

    state
        .activities
        .record_quietly(meta.stamp(
            NewActivity::new(ActivityAction::Update, EntityType::User)
                .entity(user.user_id.clone())
                .by(user.user_id.clone())
                .details(json!({ "fields": changed })),
        ))
        .await;

    Ok(Json(ApiResponse::with_message(
        "Profile updated successfully",
        result.into(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "User list", body = PaginatedResponse<UserDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<PaginatedResponse<UserDto>>, ApiError> {
    let dto = GetUserDto {
        role: params.role(),
        search: params.search,
        page: params.page,
        limit: params.limit,
    };
    let result = state.users.list_users(dto).await?;
    Ok(Json(PaginatedResponse::from_result(result, UserDto::from)))
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
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
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
    async fn register_then_login_returns_token_envelope() {
        let ctx = TestContext::new().await;
        let credentials = json!({
            "name": "Jane Driver",
            "email": "jane@example.com",
            "password": "password123"
        });

        let (status, body) = send(&ctx, "POST", "/api/users/register", None, Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["data"]["user"]["email"], "jane@example.com");
        assert_eq!(body["data"]["user"]["role"], "user");
        assert!(body["data"]["user"].get("password_hash").is_none());

        let (status, body) = send(&ctx, "POST", "/api/users/register", None, Some(credentials)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "User already exists");

        let (status, body) = send(
            &ctx,
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");

        let token = body["data"]["token"].as_str().unwrap().to_string();
        let (status, body) = send(&ctx, "GET", "/api/users/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Jane Driver");
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let ctx = TestContext::new().await;
        ctx.user("jane@example.com").await;

        let (status, body) = send(
            &ctx,
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": "nope-nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert!(body.get("two_factor_required").is_none());
    }

    #[tokio::test]
    async fn user_list_is_admin_only() {
        let ctx = TestContext::new().await;
        let user_token = ctx.token("jane@example.com").await;
        ctx.admin("root@example.com").await;
        let admin_token = ctx.login("root@example.com").await;

        let (status, _) = send(&ctx, "GET", "/api/users", Some(&user_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&ctx, "GET", "/api/users?role=admin", Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["email"], "root@example.com");
    }
}
