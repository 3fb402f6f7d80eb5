//! Authentication middleware for Axum
//!
//! `auth_middleware` verifies the `Authorization: Bearer <jwt>` header and
//! stores an [`AuthenticatedUser`] in the request extensions.
//! `admin_middleware` must run after it and rejects non-admins with 403.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::application::Actor;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::ApiError;

/// Authentication error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    NotAdmin,
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken => ApiError::unauthorized("Not authorized, no token"),
            AuthError::InvalidToken => ApiError::unauthorized("Not authorized, token failed"),
            AuthError::NotAdmin => ApiError::forbidden("Not authorized as an admin"),
        }
    }
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// The caller behind a verified token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub name: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id.clone(), self.is_admin())
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_token)
        .map(String::from);
    let Some(token) = token else {
        return ApiError::from(AuthError::MissingToken).into_response();
    };

    match verify_token(&token, &auth_state.jwt_config) {
        Ok(claims) => {
            let user = AuthenticatedUser::from_claims(claims);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            ApiError::from(AuthError::InvalidToken).into_response()
        }
    }
}

pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => ApiError::from(AuthError::NotAdmin).into_response(),
        None => ApiError::from(AuthError::MissingToken).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::crypto::jwt::create_token;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "middleware-test-secret".into(),
            expiration_hours: 1,
            issuer: "car-management".into(),
        }
    }

    fn app() -> Router {
        let state = AuthState { jwt_config: jwt() };
        let admin = Router::new()
            .route("/admin", get(|| async { "admin" }))
            .layer(middleware::from_fn(admin_middleware));
        Router::new()
            .route(
                "/me",
                get(|Extension(user): Extension<AuthenticatedUser>| async move { user.name }),
            )
            .merge(admin)
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    async fn call(path: &str, token: Option<String>) -> StatusCode {
        let mut req = Request::get(path);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        app()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn missing_and_bogus_tokens_are_401() {
        assert_eq!(call("/me", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            call("/me", Some("not-a-jwt".into())).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let token = create_token("u1", "Alice", "user", &jwt()).unwrap();
        assert_eq!(call("/me", Some(token)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_routes_reject_plain_users() {
        let user = create_token("u1", "Alice", "user", &jwt()).unwrap();
        let admin = create_token("u2", "Root", "admin", &jwt()).unwrap();
        assert_eq!(call("/admin", Some(user)).await, StatusCode::FORBIDDEN);
        assert_eq!(call("/admin", Some(admin)).await, StatusCode::OK);
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("Basic abc"), None);
        assert_eq!(extract_token("Bearer "), None);
    }
}
