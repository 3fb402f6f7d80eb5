use chrono::{DateTime, Datelike, Utc};

use crate::domain::service_record::ServiceRecord;
use crate::domain::user::OwnerSummary;
use crate::domain::{DomainError, DomainResult};

pub const MIN_YEAR: i32 = 1900;
const MAX_BRAND_LEN: usize = 50;
const MAX_MODEL_LEN: usize = 50;
const MAX_COLOR_LEN: usize = 30;
const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(Clone, Debug)]
pub struct Car {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub color: Option<String>,
    pub mileage: Option<i64>,
    pub description: Option<String>,
    /// `/uploads/cars/<file>`, an absolute URL or a `data:` URI
    pub image: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.year)
    }
}

/// A car as returned by the API: owner and service history populated.
#[derive(Clone, Debug)]
pub struct CarDetails {
    pub car: Car,
    pub owner: Option<OwnerSummary>,
    pub services: Vec<ServiceRecord>,
}

#[derive(Clone, Debug, Default)]
pub struct CreateCarDto {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub color: Option<String>,
    pub mileage: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub owner_id: String,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateCarDto {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub color: Option<String>,
    pub mileage: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Owner check shared by every mutating car, service and fuel operation.
pub fn can_modify(car: &Car, user_id: &str, is_admin: bool) -> bool {
    is_admin || car.owner_id == user_id
}

fn max_year() -> i32 {
    Utc::now().year() + 1
}

fn check_text(value: &str, max: usize, empty_msg: &str, long_msg: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(empty_msg.to_string()));
    }
    if value.trim().chars().count() > max {
        return Err(DomainError::Validation(long_msg.to_string()));
    }
    Ok(())
}

fn check_year(year: i32) -> DomainResult<()> {
    if year < MIN_YEAR || year > max_year() {
        return Err(DomainError::Validation(format!(
            "Year must be between {} and {}",
            MIN_YEAR,
            max_year()
        )));
    }
    Ok(())
}

fn check_optional(
    color: Option<&str>,
    mileage: Option<i64>,
    description: Option<&str>,
    price: Option<f64>,
) -> DomainResult<()> {
    if let Some(price) = price {
        if !price.is_finite() || price < 0.0 {
            return Err(DomainError::Validation("Price cannot be negative".into()));
        }
    }
    if let Some(color) = color {
        if color.trim().chars().count() > MAX_COLOR_LEN {
            return Err(DomainError::Validation(
                "Color cannot be more than 30 characters".into(),
            ));
        }
    }
    if let Some(mileage) = mileage {
        if mileage < 0 {
            return Err(DomainError::Validation("Mileage cannot be negative".into()));
        }
    }
    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(DomainError::Validation(
                "Description cannot be more than 500 characters".into(),
            ));
        }
    }
    Ok(())
}

/// Client-supplied images must be remote URLs or `data:` URIs; stored
/// upload references are only ever assigned by the server.
fn check_image(image: Option<&str>) -> DomainResult<()> {
    match image {
        Some(image)
            if !(image.starts_with("https://")
                || image.starts_with("http://")
                || image.starts_with("data:image/")) =>
        {
            Err(DomainError::Validation(
                "Image must be an http(s) URL or a data:image URI".into(),
            ))
        }
        _ => Ok(()),
    }
}

/// Validate and normalise (trim) a new car.
pub fn validate_new_car(dto: &mut CreateCarDto) -> DomainResult<()> {
    dto.brand = dto.brand.trim().to_string();
    dto.model = dto.model.trim().to_string();
    dto.color = trimmed(dto.color.take());
    dto.image = trimmed(dto.image.take());

    check_image(dto.image.as_deref())?;
    check_text(
        &dto.brand,
        MAX_BRAND_LEN,
        "Please provide a car brand",
        "Brand cannot be more than 50 characters",
    )?;
    check_text(
        &dto.model,
        MAX_MODEL_LEN,
        "Please provide a car model",
        "Model cannot be more than 50 characters",
    )?;
    check_year(dto.year)?;
    check_optional(
        dto.color.as_deref(),
        dto.mileage,
        dto.description.as_deref(),
        Some(dto.price),
    )
}

/// Validate and normalise a partial update.
pub fn validate_car_update(dto: &mut UpdateCarDto) -> DomainResult<()> {
    dto.image = trimmed(dto.image.take());
    check_image(dto.image.as_deref())?;
    if let Some(brand) = dto.brand.as_mut() {
        *brand = brand.trim().to_string();
        check_text(
            brand,
            MAX_BRAND_LEN,
            "Please provide a car brand",
            "Brand cannot be more than 50 characters",
        )?;
    }
    if let Some(model) = dto.model.as_mut() {
        *model = model.trim().to_string();
        check_text(
            model,
            MAX_MODEL_LEN,
            "Please provide a car model",
            "Model cannot be more than 50 characters",
        )?;
    }
    if let Some(year) = dto.year {
        check_year(year)?;
    }
    dto.color = dto.color.take().map(|c| c.trim().to_string());
    check_optional(
        dto.color.as_deref(),
        dto.mileage,
        dto.description.as_deref(),
        dto.price,
    )
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> CreateCarDto {
        CreateCarDto {
            brand: "  Toyota ".into(),
            model: "Corolla".into(),
            year: 2020,
            price: 15000.0,
            color: Some(" Red ".into()),
            owner_id: "u1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_car_is_trimmed() {
        let mut car = dto();
        validate_new_car(&mut car).unwrap();
        assert_eq!(car.brand, "Toyota");
        assert_eq!(car.color.as_deref(), Some("Red"));
    }

    #[test]
    fn missing_brand_is_rejected() {
        let mut car = dto();
        car.brand = "   ".into();
        let err = validate_new_car(&mut car).unwrap_err();
        assert_eq!(err.to_string(), "Please provide a car brand");
    }

    #[test]
    fn year_range_is_enforced() {
        let mut car = dto();
        car.year = 1899;
        assert!(validate_new_car(&mut car).is_err());

        let mut car = dto();
        car.year = max_year();
        assert!(validate_new_car(&mut car).is_ok());

        let mut car = dto();
        car.year = max_year() + 1;
        assert!(validate_new_car(&mut car).is_err());
    }

    #[test]
    fn negative_price_and_mileage_are_rejected() {
        let mut car = dto();
        car.price = -1.0;
        assert!(validate_new_car(&mut car).is_err());

        let mut update = UpdateCarDto {
            mileage: Some(-5),
            ..Default::default()
        };
        assert!(validate_car_update(&mut update).is_err());
    }

    #[test]
    fn stored_upload_references_are_not_accepted_from_clients() {
        let mut car = dto();
        car.image = Some("/uploads/cars/car-1-2.png".into());
        let err = validate_new_car(&mut car).unwrap_err();
        assert_eq!(err.to_string(), "Image must be an http(s) URL or a data:image URI");

        let mut update = UpdateCarDto {
            image: Some("../config.toml".into()),
            ..Default::default()
        };
        assert!(validate_car_update(&mut update).is_err());

        let mut car = dto();
        car.image = Some("https://cdn.example.com/car.jpg".into());
        assert!(validate_new_car(&mut car).is_ok());
        let mut update = UpdateCarDto {
            image: Some("data:image/png;base64,YWJj".into()),
            ..Default::default()
        };
        assert!(validate_car_update(&mut update).is_ok());
    }

    #[test]
    fn owner_or_admin_may_modify() {
        let mut c = dto();
        validate_new_car(&mut c).unwrap();
        let now = Utc::now();
        let car = Car {
            id: "c1".into(),
            brand: c.brand,
            model: c.model,
            year: c.year,
            price: c.price,
            color: c.color,
            mileage: None,
            description: None,
            image: None,
            owner_id: "u1".into(),
            created_at: now,
            updated_at: now,
        };
        assert!(can_modify(&car, "u1", false));
        assert!(!can_modify(&car, "u2", false));
        assert!(can_modify(&car, "u2", true));
    }
}
