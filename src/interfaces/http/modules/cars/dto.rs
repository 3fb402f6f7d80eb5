//! Car DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::cars::{CarComparison, FieldComparison, ServiceSummary};
use crate::domain::user::OwnerSummary;
use crate::domain::CarDetails;
use crate::interfaces::http::modules::services::ServiceDto;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnerDto {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<OwnerSummary> for OwnerDto {
    fn from(o: OwnerSummary) -> Self {
        Self {
            id: o.id,
            name: o.name,
            email: o.email,
        }
    }
}

/// A car with its owner and service history
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CarDto {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub color: Option<String>,
    pub mileage: Option<i64>,
    pub description: Option<String>,
    /// `/uploads/cars/<file>`, URL or `data:` URI
    pub image: Option<String>,
    pub owner: Option<OwnerDto>,
    pub services: Vec<ServiceDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CarDetails> for CarDto {
    fn from(d: CarDetails) -> Self {
        let car = d.car;
        Self {
            id: car.id,
            brand: car.brand,
            model: car.model,
            year: car.year,
            price: car.price,
            color: car.color,
            mileage: car.mileage,
            description: car.description,
            image: car.image,
            owner: d.owner.map(OwnerDto::from),
            services: d.services.into_iter().map(ServiceDto::from).collect(),
            created_at: car.created_at,
            updated_at: car.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CompareParams {
    /// First car ID (verdicts are from its point of view)
    pub first: Option<String>,
    pub second: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldComparisonDto {
    pub field: String,
    #[schema(value_type = Object)]
    pub first: serde_json::Value,
    #[schema(value_type = Object)]
    pub second: serde_json::Value,
    /// `better`, `worse`, `equal` or `neutral`
    pub verdict: String,
}

impl From<FieldComparison> for FieldComparisonDto {
    fn from(f: FieldComparison) -> Self {
        Self {
            field: f.field.to_string(),
            first: f.first,
            second: f.second,
            verdict: f.verdict.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceSummaryDto {
    pub count: usize,
    pub total_cost: f64,
    pub average_cost: f64,
}

impl From<ServiceSummary> for ServiceSummaryDto {
    fn from(s: ServiceSummary) -> Self {
        Self {
            count: s.count,
            total_cost: s.total_cost,
            average_cost: s.average_cost,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CarComparisonDto {
    pub first: CarDto,
    pub second: CarDto,
    pub fields: Vec<FieldComparisonDto>,
    pub first_services: ServiceSummaryDto,
    pub second_services: ServiceSummaryDto,
}

impl From<CarComparison> for CarComparisonDto {
    fn from(c: CarComparison) -> Self {
        Self {
            first: c.first.into(),
            second: c.second.into(),
            fields: c.fields.into_iter().map(FieldComparisonDto::from).collect(),
            first_services: c.first_services.into(),
            second_services: c.second_services.into(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct QrParams {
    /// `svg` (default) or `json`
    pub format: Option<String>,
}
