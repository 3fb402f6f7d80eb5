use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::identity::{TwoFactorSetup, TwoFactorVerification};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TwoFactorSetupResponse {
    /// Base32 secret for manual entry
    pub secret: String,
    pub otpauth_url: String,
    /// QR code of `otpauth_url`
    pub qr_svg: String,
}

impl From<TwoFactorSetup> for TwoFactorSetupResponse {
    fn from(s: TwoFactorSetup) -> Self {
        Self {
            secret: s.secret,
            otpauth_url: s.otpauth_url,
            qr_svg: s.qr_svg,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyCodeRequest {
    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TwoFactorVerifyResponse {
    pub valid: bool,
    /// Shown once, right after activation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_codes: Option<Vec<String>>,
}

impl From<TwoFactorVerification> for TwoFactorVerifyResponse {
    fn from(v: TwoFactorVerification) -> Self {
        Self {
            valid: v.valid,
            backup_codes: v.valid.then_some(v.backup_codes),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DisableTwoFactorRequest {
    #[validate(length(min = 1, message = "Please provide your password"))]
    pub password: String,
}
