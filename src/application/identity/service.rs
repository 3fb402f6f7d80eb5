//! User management service: application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};
use validator::ValidateEmail;

use crate::domain::user::{CreateUserDto, GetUserDto, TwoFactorState, UpdateUserDto};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::infrastructure::crypto::totp;
use crate::shared::PaginatedResult;

const MAX_NAME_LEN: usize = 50;
const MIN_PASSWORD_LEN: usize = 6;

/// Authentication result returned after login, registration or profile update
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub user: User,
}

/// Profile changes; every field optional
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    fn issue(&self, user: User) -> DomainResult<AuthResult> {
        let token = create_token(&user.id, &user.name, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;
        Ok(AuthResult { token, user })
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
    }

    // ── Registration ────────────────────────────────────────────

    pub async fn register(&self, name: &str, email: &str, password: &str) -> DomainResult<AuthResult> {
        self.create_account(name, email, password, UserRole::User)
            .await
            .and_then(|user| self.issue(user))
    }

    /// Create an account with an explicit role (registration, seeding, bootstrap admin).
    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> DomainResult<User> {
        let name = validate_name(name)?;
        let email = normalize_email(email)?;
        validate_password(password)?;

        if self.repos.users().get_user_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("User already exists".into()));
        }

        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                name,
                email,
                role,
                password_hash: self.hash(password)?,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, role = user.role.as_str(), "User registered");
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Email + password login. With two-factor enabled, `two_factor_code`
    /// must hold a current TOTP code or an unused backup code.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        two_factor_code: Option<&str>,
    ) -> DomainResult<AuthResult> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.repos.users().get_user_by_email(&email).await? else {
            return Err(DomainError::Unauthorized("Invalid email or password".into()));
        };

        if !verify_password(password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Unauthorized("Invalid email or password".into()));
        }

        if user.two_factor_enabled {
            let code = two_factor_code
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or(DomainError::TwoFactorRequired)?;
            if !self.check_second_factor(&user, code).await? {
                warn!(user_id = %user.id, "Rejected two-factor code");
                return Err(DomainError::TwoFactorRequired);
            }
        }

        self.repos.users().touch_last_login(&user.id).await?;
        info!(user_id = %user.id, "User logged in");
        self.issue(user)
    }

    async fn check_second_factor(&self, user: &User, code: &str) -> DomainResult<bool> {
        if let Some(secret) = user.two_factor_secret.as_deref() {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            if totp::verify_totp(secret, code, now)
                .map_err(|e| DomainError::Internal(e.to_string()))?
            {
                return Ok(true);
            }
        }

        let hashed = totp::hash_backup_code(code);
        let Some(pos) = user.backup_codes.iter().position(|c| *c == hashed) else {
            return Ok(false);
        };

        // Backup codes are single-use
        let mut remaining = user.backup_codes.clone();
        remaining.remove(pos);
        info!(user_id = %user.id, remaining = remaining.len(), "Backup code consumed");
        self.repos
            .users()
            .update_two_factor(
                &user.id,
                TwoFactorState {
                    enabled: true,
                    secret: user.two_factor_secret.clone(),
                    backup_codes: remaining,
                },
            )
            .await?;
        Ok(true)
    }

    // ── Profile ─────────────────────────────────────────────────

    pub async fn get_profile(&self, user_id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    /// Apply profile changes and hand back a fresh token (the name claim may change).
    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> DomainResult<AuthResult> {
        let current = self.get_profile(user_id).await?;

        let name = update.name.as_deref().map(validate_name).transpose()?;
        let email = match update.email.as_deref() {
            Some(email) => {
                let email = normalize_email(email)?;
                if email != current.email {
                    if let Some(other) = self.repos.users().get_user_by_email(&email).await? {
                        if other.id != current.id {
                            return Err(DomainError::Conflict("Email already in use".into()));
                        }
                    }
                }
                Some(email)
            }
            None => None,
        };
        let password_hash = match update.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(self.hash(password)?)
            }
            None => None,
        };

        let user = self
            .repos
            .users()
            .update_user(
                user_id,
                UpdateUserDto {
                    name,
                    email,
                    password_hash,
                },
            )
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        info!(user_id = %user.id, "Profile updated");
        self.issue(user)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        self.repos.users().list_users(dto).await
    }

    /// Make sure an administrator exists; creates one from the given
    /// credentials when the email is unknown. Returns `true` when created.
    pub async fn ensure_admin(&self, name: &str, email: &str, password: &str) -> DomainResult<bool> {
        let email = normalize_email(email)?;
        if self.repos.users().get_user_by_email(&email).await?.is_some() {
            return Ok(false);
        }
        self.create_account(name, &email, password, UserRole::Admin)
            .await?;
        Ok(true)
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("Please add a name".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::Validation(
            "Name cannot be more than 50 characters".into(),
        ));
    }
    Ok(name.to_string())
}

fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation("Please add a valid email".into()));
    }
    Ok(email)
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;

    #[tokio::test]
    async fn register_then_login() {
        let ctx = TestContext::new().await;
        let users = ctx.state.user_service.clone();

        let registered = users
            .register("Alice", " Alice@Example.com ", "secret1")
            .await
            .unwrap();
        assert_eq!(registered.user.email, "alice@example.com");
        assert_eq!(registered.user.role, UserRole::User);

        let logged_in = users.login("alice@example.com", "secret1", None).await.unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);

        let err = users.login("alice@example.com", "wrong", None).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let ctx = TestContext::new().await;
        let users = ctx.state.user_service.clone();
        users.register("A", "a@example.com", "secret1").await.unwrap();
        let err = users.register("B", "A@example.com", "secret2").await.unwrap_err();
        assert_eq!(err.to_string(), "User already exists");
    }

    #[tokio::test]
    async fn short_password_and_bad_email_are_rejected() {
        let ctx = TestContext::new().await;
        let users = ctx.state.user_service.clone();
        assert!(matches!(
            users.register("A", "a@example.com", "123").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            users.register("A", "not-an-email", "secret1").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn profile_update_changes_password() {
        let ctx = TestContext::new().await;
        let users = ctx.state.user_service.clone();
        let auth = users.register("A", "a@example.com", "secret1").await.unwrap();

        let updated = users
            .update_profile(
                &auth.user.id,
                ProfileUpdate {
                    name: Some("Anna".into()),
                    password: Some("newsecret".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.user.name, "Anna");
        assert!(users.login("a@example.com", "newsecret", None).await.is_ok());
        assert!(users.login("a@example.com", "secret1", None).await.is_err());
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let ctx = TestContext::new().await;
        let users = ctx.state.user_service.clone();
        assert!(users.ensure_admin("Root", "root@example.com", "rootpass").await.unwrap());
        assert!(!users.ensure_admin("Root", "root@example.com", "rootpass").await.unwrap());
        let root = users.login("root@example.com", "rootpass", None).await.unwrap();
        assert!(root.user.is_admin());
    }
}
