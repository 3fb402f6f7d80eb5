use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use super::dto::{
    DisableTwoFactorRequest, TwoFactorSetupResponse, TwoFactorVerifyResponse, VerifyCodeRequest,
};
use crate::application::TwoFactorService;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct TwoFactorHandlerState {
    pub two_factor: Arc<TwoFactorService>,
}

#[utoipa::path(
    post,
    path = "/api/auth/2fa/setup",
    tag = "Two-Factor",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Secret generated, awaiting verification", body = ApiResponse<TwoFactorSetupResponse>),
        (status = 400, description = "Already enabled")
    )
)]
pub async fn setup(
    State(state): State<TwoFactorHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<TwoFactorSetupResponse>>, ApiError> {
    let setup = state.two_factor.setup(&user.user_id).await?;
    Ok(Json(ApiResponse::success(setup.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/2fa/verify",
    tag = "Two-Factor",
    security(("bearer_auth" = [])),
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Verification outcome", body = ApiResponse<TwoFactorVerifyResponse>),
        (status = 422, description = "Malformed code")
    )
)]
pub async fn verify(
    State(state): State<TwoFactorHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<VerifyCodeRequest>,
) -> Result<Json<ApiResponse<TwoFactorVerifyResponse>>, ApiError> {
    let outcome = state.two_factor.verify(&user.user_id, &request.code).await?;
    let message = if outcome.valid {
        "Two-factor authentication enabled"
    } else {
        "Invalid verification code"
    };
    Ok(Json(ApiResponse::with_message(message, outcome.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/2fa/disable",
    tag = "Two-Factor",
    security(("bearer_auth" = [])),
    request_body = DisableTwoFactorRequest,
    responses(
        (status = 200, description = "Two-factor authentication disabled"),
        (status = 401, description = "Wrong password")
    )
)]
pub async fn disable(
    State(state): State<TwoFactorHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<DisableTwoFactorRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .two_factor
        .disable(&user.user_id, &request.password)
        .await?;
    Ok(Json(ApiResponse::message(
        "Two-factor authentication disabled",
    )))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::crypto::totp;
    use crate::interfaces::http::router::create_router;
    use crate::test_support::TestContext;

    async fn post(ctx: &TestContext, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = req.body(Body::from(body.to_string())).unwrap();
        let res = create_router(ctx.state.clone()).oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn current_code(secret: &str) -> String {
        let key = totp::base32_decode(secret).unwrap();
        totp::totp_at(&key, chrono::Utc::now().timestamp() as u64).unwrap()
    }

    #[tokio::test]
    async fn enabled_two_factor_gates_login() {
        let ctx = TestContext::new().await;
        let token = ctx.token("jane@example.com").await;

        let (status, body) = post(&ctx, "/api/auth/2fa/setup", Some(&token), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["qr_svg"].as_str().unwrap().contains("<svg"));
        let secret = body["data"]["secret"].as_str().unwrap().to_string();

        let (status, body) = post(
            &ctx,
            "/api/auth/2fa/verify",
            Some(&token),
            json!({ "code": current_code(&secret) }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["valid"], true);
        let backup_codes = body["data"]["backup_codes"].as_array().unwrap().clone();
        assert_eq!(backup_codes.len(), 8);

        let credentials = json!({ "email": "jane@example.com", "password": "password123" });
        let (status, body) = post(&ctx, "/api/users/login", None, credentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["two_factor_required"], true);

        let (status, _) = post(
            &ctx,
            "/api/users/login",
            None,
            json!({
                "email": "jane@example.com",
                "password": "password123",
                "two_factor_code": backup_codes[0]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_code_is_422() {
        let ctx = TestContext::new().await;
        let token = ctx.token("jane@example.com").await;
        post(&ctx, "/api/auth/2fa/setup", Some(&token), json!({})).await;

        let (status, _) = post(&ctx, "/api/auth/2fa/verify", Some(&token), json!({ "code": "12" })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
