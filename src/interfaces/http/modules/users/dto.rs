//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::identity::AuthResult;
use crate::domain::{User, UserRole};

/// User API representation (no secrets)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub two_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            role: u.role.as_str().to_string(),
            id: u.id,
            name: u.name,
            email: u.email,
            two_factor_enabled: u.two_factor_enabled,
            created_at: u.created_at,
            updated_at: u.updated_at,
            last_login_at: u.last_login_at,
        }
    }
}

/// Token plus the user it was issued for
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

impl From<AuthResult> for AuthResponse {
    fn from(r: AuthResult) -> Self {
        Self {
            token: r.token,
            user: r.user.into(),
        }
    }
}

/// Field rules are enforced by the identity service (400 on failure).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Please provide an email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please provide a password"))]
    pub password: String,
    /// TOTP code or unused backup code, when 2FA is enabled
    #[serde(default)]
    pub two_factor_code: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Substring of name or email
    pub search: Option<String>,
    /// `user` or `admin`
    pub role: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListUsersParams {
    pub fn role(&self) -> Option<UserRole> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}
