use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::service_records::{CarRef, ServiceWithCar};
use crate::domain::service_record::{CreateServiceDto, UpdateServiceDto};
use crate::domain::{ServiceRecord, ServiceType};
use crate::interfaces::http::common::ApiError;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceDto {
    pub id: String,
    /// Car id
    pub car: String,
    pub description: String,
    pub cost: f64,
    /// `maintenance`, `repair`, `inspection` or `other`
    pub service_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceRecord> for ServiceDto {
    fn from(s: ServiceRecord) -> Self {
        Self {
            service_type: s.service_type.as_str().to_string(),
            id: s.id,
            car: s.car_id,
            description: s.description,
            cost: s.cost,
            service_provider: s.service_provider,
            date: s.date,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CarRefDto {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
}

impl From<CarRef> for CarRefDto {
    fn from(c: CarRef) -> Self {
        Self {
            id: c.id,
            brand: c.brand,
            model: c.model,
            year: c.year,
        }
    }
}

/// A service record with its car populated (admin listing)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceWithCarDto {
    pub id: String,
    pub car: Option<CarRefDto>,
    pub description: String,
    pub cost: f64,
    pub service_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceWithCar> for ServiceWithCarDto {
    fn from(s: ServiceWithCar) -> Self {
        let r = s.record;
        Self {
            service_type: r.service_type.as_str().to_string(),
            id: r.id,
            car: s.car.map(CarRefDto::from),
            description: r.description,
            cost: r.cost,
            service_provider: r.service_provider,
            date: r.date,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

fn parse_service_type(value: Option<&str>) -> Result<Option<ServiceType>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse::<ServiceType>()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("Invalid service type '{}'", v))),
    }
}

/// Lengths and ranges are checked by the service layer (400).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceRequest {
    /// Car id
    #[serde(alias = "car_id")]
    pub car: String,
    #[serde(default)]
    pub description: String,
    pub cost: Option<f64>,
    pub service_type: Option<String>,
    pub service_provider: Option<String>,
    /// Defaults to now
    pub date: Option<DateTime<Utc>>,
}

impl CreateServiceRequest {
    pub fn into_dto(self) -> Result<CreateServiceDto, ApiError> {
        Ok(CreateServiceDto {
            service_type: parse_service_type(self.service_type.as_deref())?.unwrap_or_default(),
            car_id: self.car,
            description: self.description,
            cost: self.cost.unwrap_or(0.0),
            service_provider: self.service_provider,
            date: self.date.unwrap_or_else(Utc::now),
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceRequest {
    pub description: Option<String>,
    pub cost: Option<f64>,
    pub service_type: Option<String>,
    pub service_provider: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl UpdateServiceRequest {
    pub fn into_dto(self) -> Result<UpdateServiceDto, ApiError> {
        Ok(UpdateServiceDto {
            service_type: parse_service_type(self.service_type.as_deref())?,
            description: self.description,
            cost: self.cost,
            service_provider: self.service_provider,
            date: self.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_missing_fields() {
        let req: CreateServiceRequest =
            serde_json::from_str(r#"{"car":"c1","description":"Oil"}"#).unwrap();
        let dto = req.into_dto().unwrap();
        assert_eq!(dto.cost, 0.0);
        assert_eq!(dto.service_type, ServiceType::Maintenance);
    }

    #[test]
    fn unknown_service_type_is_rejected() {
        let req: CreateServiceRequest =
            serde_json::from_str(r#"{"car":"c1","description":"Oil","service_type":"wash"}"#)
                .unwrap();
        assert!(req.into_dto().is_err());
    }
}
