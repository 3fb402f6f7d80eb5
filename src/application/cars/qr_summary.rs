//! Payload encoded in a car's QR code

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::CarDetails;

#[derive(Debug, Clone, Serialize)]
pub struct QrOwner {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QrPayload {
    pub car_id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub color: Option<String>,
    pub mileage: Option<i64>,
    pub description: Option<String>,
    pub car_url: String,
    pub service_history_url: String,
    pub generated_at: DateTime<Utc>,
    pub owner: Option<QrOwner>,
}

impl QrPayload {
    pub fn new(details: &CarDetails, public_base_url: &str, now: DateTime<Utc>) -> Self {
        let car = &details.car;
        let base = public_base_url.trim_end_matches('/');
        let car_url = format!("{}/cars/{}", base, car.id);
        Self {
            car_id: car.id.clone(),
            brand: car.brand.clone(),
            model: car.model.clone(),
            year: car.year,
            price: car.price,
            color: car.color.clone(),
            mileage: car.mileage,
            description: car.description.clone(),
            service_history_url: format!("{}#services", car_url),
            car_url,
            generated_at: now,
            owner: details.owner.as_ref().map(|o| QrOwner {
                name: o.name.clone(),
                email: o.email.clone(),
            }),
        }
    }
}
