//! Car create/update body: `multipart/form-data` (with an optional `image`
//! file part) or plain JSON.

use std::str::FromStr;

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::car::{CreateCarDto, UpdateCarDto};
use crate::infrastructure::UploadedImage;
use crate::interfaces::http::common::ApiError;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CarFields {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub color: Option<String>,
    pub mileage: Option<i64>,
    pub description: Option<String>,
    /// Image URL or `data:` URI when no file is uploaded
    pub image: Option<String>,
}

fn parse<T: FromStr>(value: &str, message: &str) -> Result<Option<T>, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ApiError::bad_request(message))
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl CarFields {
    /// Assign a text form field; unknown names are ignored.
    fn set(&mut self, name: &str, value: String) -> Result<(), ApiError> {
        match name {
            "brand" => self.brand = Some(value),
            "model" => self.model = Some(value),
            "year" => self.year = parse(&value, "Year must be a number")?,
            "price" => self.price = parse(&value, "Price must be a number")?,
            "color" => self.color = non_empty(value),
            "mileage" => self.mileage = parse(&value, "Mileage must be a whole number")?,
            "description" => self.description = non_empty(value),
            "image" => self.image = non_empty(value),
            _ => {}
        }
        Ok(())
    }

    pub fn into_create(self) -> Result<CreateCarDto, ApiError> {
        let year = self
            .year
            .ok_or_else(|| ApiError::bad_request("Please provide the year"))?;
        let price = self
            .price
            .ok_or_else(|| ApiError::bad_request("Please provide a price"))?;
        Ok(CreateCarDto {
            brand: self.brand.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            year,
            price,
            color: self.color,
            mileage: self.mileage,
            description: self.description,
            image: self.image,
            owner_id: String::new(),
        })
    }

    pub fn into_update(self) -> UpdateCarDto {
        UpdateCarDto {
            brand: self.brand,
            model: self.model,
            year: self.year,
            price: self.price,
            color: self.color,
            mileage: self.mileage,
            description: self.description,
            image: self.image,
        }
    }
}

pub struct CarForm {
    pub fields: CarFields,
    pub image: Option<UploadedImage>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::new(e.status(), e.body_text())
}

async fn read_multipart(mut multipart: Multipart) -> Result<CarForm, ApiError> {
    let mut fields = CarFields::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" && field.file_name().is_some() {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let file_name = field.file_name().map(String::from);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            // browsers send an empty part when no file was picked
            if !bytes.is_empty() {
                image = Some(UploadedImage {
                    content_type,
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        fields.set(&name, value)?;
    }

    Ok(CarForm { fields, image })
}

impl<S> FromRequest<S> for CarForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|r| ApiError::bad_request(r.body_text()))?;
            read_multipart(multipart).await
        } else {
            let Json(fields) = Json::<CarFields>::from_request(req, state)
                .await
                .map_err(|r| ApiError::bad_request(format!("Invalid JSON: {}", r.body_text())))?;
            Ok(CarForm {
                fields,
                image: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    const BOUNDARY: &str = "X-CAR-BOUNDARY";

    fn multipart_request(parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> Request {
        let mut body = Vec::new();
        for (name, file, data) in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match file {
                Some((file_name, mime)) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, mime
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/cars")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn multipart_fields_and_file_are_read() {
        let req = multipart_request(&[
            ("brand", None, b"Toyota"),
            ("model", None, b"Camry"),
            ("year", None, b"2020"),
            ("price", None, b"25000"),
            ("mileage", None, b""),
            ("image", Some(("car.png", "image/png")), b"\x89PNG"),
        ]);
        let form = CarForm::from_request(req, &()).await.unwrap();
        assert_eq!(form.fields.brand.as_deref(), Some("Toyota"));
        assert_eq!(form.fields.year, Some(2020));
        assert_eq!(form.fields.mileage, None);
        let image = form.image.unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.bytes, b"\x89PNG");
    }

    #[tokio::test]
    async fn bad_numbers_are_rejected() {
        let req = multipart_request(&[("year", None, b"twenty")]);
        let err = CarForm::from_request(req, &()).await.err().unwrap();
        assert_eq!(err.message, "Year must be a number");
    }

    #[tokio::test]
    async fn json_bodies_are_accepted() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/cars")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"brand":"BMW","model":"X5","year":2021,"price":55000}"#))
            .unwrap();
        let form = CarForm::from_request(req, &()).await.unwrap();
        assert!(form.image.is_none());
        let dto = form.fields.into_create().unwrap();
        assert_eq!(dto.price, 55000.0);
    }

    #[test]
    fn create_requires_year_and_price() {
        let fields = CarFields {
            brand: Some("BMW".into()),
            model: Some("X5".into()),
            ..Default::default()
        };
        assert_eq!(
            fields.into_create().err().unwrap().message,
            "Please provide the year"
        );
    }
}
