use chrono::{DateTime, Utc};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(()),
        }
    }
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub two_factor_enabled: bool,
    /// Base32 TOTP secret; present from setup onwards, even before verification
    pub two_factor_secret: Option<String>,
    /// SHA-256 hex digests of the unused backup codes
    pub backup_codes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn summary(&self) -> OwnerSummary {
        OwnerSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The `{id, name, email}` projection embedded in cars
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Persisted two-factor settings of a user
#[derive(Clone, Debug, Default)]
pub struct TwoFactorState {
    pub enabled: bool,
    pub secret: Option<String>,
    pub backup_codes: Vec<String>,
}
