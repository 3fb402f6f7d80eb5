use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FuelType {
    #[default]
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gasoline => "gasoline",
            Self::Diesel => "diesel",
            Self::Electric => "electric",
            Self::Hybrid => "hybrid",
        }
    }
}

impl std::str::FromStr for FuelType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gasoline" => Ok(Self::Gasoline),
            "diesel" => Ok(Self::Diesel),
            "electric" => Ok(Self::Electric),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FuelEntry {
    pub id: String,
    pub car_id: String,
    pub date: DateTime<Utc>,
    pub fuel_amount: f64,
    pub cost: f64,
    /// Odometer reading at refuelling time
    pub mileage: i64,
    pub fuel_type: FuelType,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct CreateFuelEntryDto {
    pub car_id: String,
    pub date: DateTime<Utc>,
    pub fuel_amount: f64,
    pub cost: f64,
    pub mileage: i64,
    pub fuel_type: FuelType,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

pub fn validate_fuel_entry(dto: &CreateFuelEntryDto) -> DomainResult<()> {
    if !dto.fuel_amount.is_finite() || dto.fuel_amount <= 0.0 {
        return Err(DomainError::Validation(
            "Fuel amount must be greater than zero".into(),
        ));
    }
    if !dto.cost.is_finite() || dto.cost < 0.0 {
        return Err(DomainError::Validation("Cost cannot be negative".into()));
    }
    if dto.mileage < 0 {
        return Err(DomainError::Validation("Mileage cannot be negative".into()));
    }
    if dto.notes.as_deref().map_or(0, |n| n.chars().count()) > 500 {
        return Err(DomainError::Validation(
            "Notes cannot be more than 500 characters".into(),
        ));
    }
    Ok(())
}
