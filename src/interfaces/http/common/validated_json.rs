//! JSON body extractor that also runs `validator` checks
//!
//! Malformed JSON is answered with 400, a body that parses but fails its
//! `#[validate]` rules with 422 listing every field message.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiError;

pub struct ValidatedJson<T>(pub T);

fn rejection_message(rejection: &JsonRejection) -> String {
    format!("Invalid JSON: {}", rejection.body_text())
}

/// `field: message` pairs joined with `; `, sorted by field name.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let parts: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();

    if parts.is_empty() {
        "Validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|r| ApiError::bad_request(rejection_message(&r)))?;

        value
            .validate()
            .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, describe(&e)))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Login {
        #[validate(email(message = "Please provide a valid email"))]
        email: String,
        #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
        password: String,
    }

    async fn handler(ValidatedJson(body): ValidatedJson<Login>) -> String {
        body.email
    }

    async fn post_body(body: &'static str) -> StatusCode {
        Router::new()
            .route("/login", post(handler))
            .oneshot(
                Request::post("/login")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let status = post_body(r#"{"email":"a@b.io","password":"secret1"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        assert_eq!(post_body("{oops").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rule_violations_are_422() {
        let status = post_body(r#"{"email":"nope","password":"123"}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn messages_list_every_field() {
        let err = Login {
            email: "nope".into(),
            password: "1".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            describe(&err),
            "email: Please provide a valid email; password: Password must be at least 6 characters"
        );
    }
}
