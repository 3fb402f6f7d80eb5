//! Two-factor authentication enrolment

use std::sync::Arc;

use tracing::info;

use crate::application::qr::render_svg;
use crate::domain::user::TwoFactorState;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::password::verify_password;
use crate::infrastructure::crypto::totp;

const ISSUER: &str = "Car Management System";

#[derive(Debug, Clone)]
pub struct TwoFactorSetup {
    pub secret: String,
    pub otpauth_url: String,
    pub qr_svg: String,
}

#[derive(Debug, Clone)]
pub struct TwoFactorVerification {
    pub valid: bool,
    /// Plain codes, only returned once on successful activation
    pub backup_codes: Vec<String>,
}

pub struct TwoFactorService {
    repos: Arc<dyn RepositoryProvider>,
}

impl TwoFactorService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn user(&self, user_id: &str) -> DomainResult<crate::domain::User> {
        self.repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    /// Generate and store a new secret. 2FA stays disabled until verified.
    pub async fn setup(&self, user_id: &str) -> DomainResult<TwoFactorSetup> {
        let user = self.user(user_id).await?;
        if user.two_factor_enabled {
            return Err(DomainError::Conflict(
                "Two-factor authentication is already enabled".into(),
            ));
        }

        let secret = totp::generate_secret();
        let otpauth_url = totp::otpauth_url(ISSUER, &user.email, &secret);
        let qr_svg = render_svg(&otpauth_url)?;

        self.repos
            .users()
            .update_two_factor(
                user_id,
                TwoFactorState {
                    enabled: false,
                    secret: Some(secret.clone()),
                    backup_codes: Vec::new(),
                },
            )
            .await?;

        info!(user_id, "Two-factor secret generated");
        Ok(TwoFactorSetup {
            secret,
            otpauth_url,
            qr_svg,
        })
    }

    /// Confirm enrolment with a code from the authenticator app.
    pub async fn verify(&self, user_id: &str, code: &str) -> DomainResult<TwoFactorVerification> {
        let user = self.user(user_id).await?;
        let Some(secret) = user.two_factor_secret.clone() else {
            return Err(DomainError::Validation(
                "Two-factor setup has not been started".into(),
            ));
        };

        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let valid = totp::verify_totp(&secret, code, now)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            return Ok(TwoFactorVerification {
                valid: false,
                backup_codes: Vec::new(),
            });
        }

        let backup_codes = totp::generate_backup_codes();
        self.repos
            .users()
            .update_two_factor(
                user_id,
                TwoFactorState {
                    enabled: true,
                    secret: Some(secret),
                    backup_codes: backup_codes.iter().map(|c| totp::hash_backup_code(c)).collect(),
                },
            )
            .await?;

        info!(user_id, "Two-factor authentication enabled");
        Ok(TwoFactorVerification {
            valid: true,
            backup_codes,
        })
    }

    /// Turn 2FA off; requires the account password.
    pub async fn disable(&self, user_id: &str, password: &str) -> DomainResult<()> {
        let user = self.user(user_id).await?;
        if !verify_password(password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Unauthorized("Invalid password".into()));
        }

        self.repos
            .users()
            .update_two_factor(user_id, TwoFactorState::default())
            .await?;

        info!(user_id, "Two-factor authentication disabled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::test_support::TestContext;

    fn current_code(secret: &str) -> String {
        let key = totp::base32_decode(secret).unwrap();
        totp::totp_at(&key, chrono::Utc::now().timestamp() as u64).unwrap()
    }

    #[tokio::test]
    async fn enrolment_and_login_with_codes() {
        let ctx = TestContext::new().await;
        let users = ctx.state.user_service.clone();
        let two_factor = ctx.state.two_factor_service.clone();
        let auth = users.register("A", "a@example.com", "secret1").await.unwrap();

        let setup = two_factor.setup(&auth.user.id).await.unwrap();
        assert!(setup.otpauth_url.contains(&setup.secret));
        assert!(setup.qr_svg.contains("<svg"));

        // not enabled until verified
        assert!(users.login("a@example.com", "secret1", None).await.is_ok());

        let key = totp::base32_decode(&setup.secret).unwrap();
        let now = chrono::Utc::now().timestamp() as u64;
        let window: Vec<String> = [now - 60, now - 30, now, now + 30, now + 60]
            .iter()
            .map(|t| totp::totp_at(&key, *t).unwrap())
            .collect();
        let wrong_code = ["000000", "111111", "222222", "333333", "444444", "555555"]
            .into_iter()
            .find(|c| !window.iter().any(|w| w == c))
            .unwrap();
        let wrong = two_factor.verify(&auth.user.id, wrong_code).await.unwrap();
        assert!(!wrong.valid);

        let verified = two_factor
            .verify(&auth.user.id, &current_code(&setup.secret))
            .await
            .unwrap();
        assert!(verified.valid);
        assert_eq!(verified.backup_codes.len(), totp::BACKUP_CODE_COUNT);

        assert!(matches!(
            users.login("a@example.com", "secret1", None).await,
            Err(DomainError::TwoFactorRequired)
        ));
        assert!(users
            .login("a@example.com", "secret1", Some(&current_code(&setup.secret)))
            .await
            .is_ok());

        let backup = verified.backup_codes[0].clone();
        assert!(users
            .login("a@example.com", "secret1", Some(&backup))
            .await
            .is_ok());
        // consumed
        assert!(matches!(
            users.login("a@example.com", "secret1", Some(&backup)).await,
            Err(DomainError::TwoFactorRequired)
        ));

        assert!(two_factor.disable(&auth.user.id, "wrong").await.is_err());
        two_factor.disable(&auth.user.id, "secret1").await.unwrap();
        assert!(users.login("a@example.com", "secret1", None).await.is_ok());
    }
}
