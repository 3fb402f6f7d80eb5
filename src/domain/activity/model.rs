use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
    View,
    Login,
    Logout,
    GenerateReport,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::View => "view",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::GenerateReport => "generate_report",
        }
    }
}

impl std::str::FromStr for ActivityAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "view" => Ok(Self::View),
            "login" => Ok(Self::Login),
            "logout" => Ok(Self::Logout),
            "generate_report" => Ok(Self::GenerateReport),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Car,
    Service,
    User,
    Report,
    FuelEntry,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Service => "service",
            Self::User => "user",
            Self::Report => "report",
            Self::FuelEntry => "fuel_entry",
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(Self::Car),
            "service" => Ok(Self::Service),
            "user" => Ok(Self::User),
            "report" => Ok(Self::Report),
            "fuel_entry" => Ok(Self::FuelEntry),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Activity {
    pub id: String,
    pub action: ActivityAction,
    pub entity_type: EntityType,
    pub entity_id: Option<String>,
    pub user_id: Option<String>,
    pub details: serde_json::Value,
    pub user_agent: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewActivity {
    pub action: ActivityAction,
    pub entity_type: EntityType,
    pub entity_id: Option<String>,
    pub user_id: Option<String>,
    pub details: serde_json::Value,
    pub user_agent: Option<String>,
    pub url: Option<String>,
}

impl NewActivity {
    pub fn new(action: ActivityAction, entity_type: EntityType) -> Self {
        Self {
            action,
            entity_type,
            entity_id: None,
            user_id: None,
            details: serde_json::Value::Object(Default::default()),
            user_agent: None,
            url: None,
        }
    }

    pub fn entity(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn by(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActivityFilter {
    pub action: Option<ActivityAction>,
    pub entity_type: Option<EntityType>,
    pub user_id: Option<String>,
    pub page: u32,
    pub limit: u32,
}

/// A grouped count (`top_actions` / `top_users`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityCount {
    pub key: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_wire_values() {
        assert_eq!(ActivityAction::GenerateReport.as_str(), "generate_report");
        assert_eq!("fuel_entry".parse::<EntityType>(), Ok(EntityType::FuelEntry));
        assert!("explode".parse::<ActivityAction>().is_err());
    }

    #[test]
    fn builder_sets_fields() {
        let a = NewActivity::new(ActivityAction::Create, EntityType::Car)
            .entity("c1")
            .by("u1")
            .details(serde_json::json!({"brand": "BMW"}));
        assert_eq!(a.entity_id.as_deref(), Some("c1"));
        assert_eq!(a.user_id.as_deref(), Some("u1"));
        assert_eq!(a.details["brand"], "BMW");
    }
}
