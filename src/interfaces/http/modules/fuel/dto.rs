use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::fuel::{CreateFuelEntryDto, FuelEntry, FuelStats, FuelType};
use crate::interfaces::http::common::ApiError;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FuelEntryDto {
    pub id: String,
    pub car: String,
    pub date: DateTime<Utc>,
    pub fuel_amount: f64,
    pub cost: f64,
    /// Odometer reading
    pub mileage: i64,
    pub fuel_type: String,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FuelEntry> for FuelEntryDto {
    fn from(e: FuelEntry) -> Self {
        Self {
            id: e.id,
            car: e.car_id,
            date: e.date,
            fuel_amount: e.fuel_amount,
            cost: e.cost,
            mileage: e.mileage,
            fuel_type: e.fuel_type.as_str().to_string(),
            notes: e.notes,
            created_by: e.created_by,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFuelEntryRequest {
    /// Defaults to now
    pub date: Option<DateTime<Utc>>,
    #[validate(range(exclusive_min = 0.0, message = "Fuel amount must be greater than zero"))]
    pub fuel_amount: f64,
    #[validate(range(min = 0.0, message = "Cost cannot be negative"))]
    pub cost: f64,
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub mileage: i64,
    /// `gasoline` (default), `diesel`, `electric` or `hybrid`
    pub fuel_type: Option<String>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

impl CreateFuelEntryRequest {
    pub fn into_dto(self, car_id: String) -> Result<CreateFuelEntryDto, ApiError> {
        let fuel_type = match self.fuel_type.as_deref() {
            None | Some("") => FuelType::default(),
            Some(s) => s.parse::<FuelType>().map_err(|_| {
                ApiError::bad_request(format!("Invalid fuel type '{}'", s))
            })?,
        };
        Ok(CreateFuelEntryDto {
            car_id,
            date: self.date.unwrap_or_else(Utc::now),
            fuel_amount: self.fuel_amount,
            cost: self.cost,
            mileage: self.mileage,
            fuel_type,
            notes: self.notes,
            created_by: None,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FuelStatsDto {
    /// Distance per unit of fuel; null without enough data
    pub efficiency: Option<f64>,
    pub total_cost: f64,
    pub average_cost_per_distance: f64,
    pub entry_count: usize,
    /// `good`, `fair`, `poor` or `unknown`
    pub rating: String,
}

impl From<FuelStats> for FuelStatsDto {
    fn from(s: FuelStats) -> Self {
        Self {
            efficiency: s.efficiency,
            total_cost: s.total_cost,
            average_cost_per_distance: s.average_cost_per_distance,
            entry_count: s.entry_count,
            rating: s.rating.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(fuel_type: Option<&str>) -> CreateFuelEntryRequest {
        CreateFuelEntryRequest {
            date: None,
            fuel_amount: 40.0,
            cost: 60.0,
            mileage: 1000,
            fuel_type: fuel_type.map(String::from),
            notes: None,
        }
    }

    #[test]
    fn fuel_type_defaults_to_gasoline() {
        let dto = request(None).into_dto("car-1".into()).unwrap();
        assert_eq!(dto.fuel_type, FuelType::Gasoline);
        assert_eq!(dto.car_id, "car-1");
    }

    #[test]
    fn unknown_fuel_type_is_rejected() {
        assert!(request(Some("steam")).into_dto("car-1".into()).is_err());
    }

    #[test]
    fn zero_fuel_fails_validation() {
        let mut req = request(None);
        req.fuel_amount = 0.0;
        assert!(req.validate().is_err());
    }
}
