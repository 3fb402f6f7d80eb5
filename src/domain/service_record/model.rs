use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

const MAX_DESCRIPTION_LEN: usize = 500;
const MAX_PROVIDER_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceType {
    #[default]
    Maintenance,
    Repair,
    Inspection,
    Other,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maintenance => "maintenance",
            Self::Repair => "repair",
            Self::Inspection => "inspection",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for ServiceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "maintenance" => Ok(Self::Maintenance),
            "repair" => Ok(Self::Repair),
            "inspection" => Ok(Self::Inspection),
            "other" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServiceRecord {
    pub id: String,
    pub car_id: String,
    pub description: String,
    pub cost: f64,
    pub service_type: ServiceType,
    pub service_provider: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct CreateServiceDto {
    pub car_id: String,
    pub description: String,
    pub cost: f64,
    pub service_type: ServiceType,
    pub service_provider: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateServiceDto {
    pub description: Option<String>,
    pub cost: Option<f64>,
    pub service_type: Option<ServiceType>,
    pub service_provider: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

fn check_description(description: &str) -> DomainResult<()> {
    if description.trim().is_empty() {
        return Err(DomainError::Validation(
            "Please provide a service description".into(),
        ));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::Validation(
            "Description cannot be more than 500 characters".into(),
        ));
    }
    Ok(())
}

fn check_cost(cost: f64) -> DomainResult<()> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(DomainError::Validation("Cost cannot be negative".into()));
    }
    Ok(())
}

fn check_provider(provider: Option<&str>) -> DomainResult<()> {
    match provider {
        Some(p) if p.chars().count() > MAX_PROVIDER_LEN => Err(DomainError::Validation(
            "Service provider cannot be more than 100 characters".into(),
        )),
        _ => Ok(()),
    }
}

pub fn validate_new_service(dto: &mut CreateServiceDto) -> DomainResult<()> {
    dto.description = dto.description.trim().to_string();
    dto.service_provider = dto
        .service_provider
        .take()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    check_description(&dto.description)?;
    check_cost(dto.cost)?;
    check_provider(dto.service_provider.as_deref())
}

pub fn validate_service_update(dto: &mut UpdateServiceDto) -> DomainResult<()> {
    if let Some(description) = dto.description.as_mut() {
        *description = description.trim().to_string();
        check_description(description)?;
    }
    if let Some(cost) = dto.cost {
        check_cost(cost)?;
    }
    dto.service_provider = dto.service_provider.take().map(|p| p.trim().to_string());
    check_provider(dto.service_provider.as_deref())
}
