//! Mapping of internal failures onto HTTP statuses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::cars::CarWriteError;
use crate::application::reports::ReportError;
use crate::domain::DomainError;
use crate::infrastructure::ImageError;

/// Body of every failed request
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    /// Set on login when a second factor is needed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_factor_required: Option<bool>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    two_factor_required: bool,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            two_factor_required: false,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Logs `cause` and answers with the generic 500 message.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!(error = %cause, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { .. } => Self::not_found(e.to_string()),
            DomainError::Validation(msg) | DomainError::Conflict(msg) => Self::bad_request(msg),
            DomainError::Unauthorized(msg) => Self::unauthorized(msg),
            DomainError::Forbidden(msg) => Self::forbidden(msg),
            DomainError::TwoFactorRequired => Self {
                status: StatusCode::UNAUTHORIZED,
                message: e.to_string(),
                two_factor_required: true,
            },
            DomainError::Database(_) | DomainError::Internal(_) => Self::internal(e),
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::NotAnImage => Self::bad_request(e.to_string()),
            ImageError::TooLarge { .. } => Self::new(StatusCode::PAYLOAD_TOO_LARGE, e.to_string()),
            ImageError::Io(_) => Self::internal(e),
        }
    }
}

impl From<CarWriteError> for ApiError {
    fn from(e: CarWriteError) -> Self {
        match e {
            CarWriteError::Domain(inner) => inner.into(),
            CarWriteError::Image(inner) => inner.into(),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Domain(inner) => inner.into(),
            other => Self::internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.message,
            two_factor_required: self.two_factor_required.then_some(true),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::not_found("Car", "x"), StatusCode::NOT_FOUND),
            (DomainError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("User already exists".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (DomainError::Database("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn internal_errors_hide_the_cause() {
        let err = ApiError::from(DomainError::Database("secret table".into()));
        assert_eq!(err.message, "Server error");
    }

    #[test]
    fn two_factor_flag_is_serialised() {
        let err = ApiError::from(DomainError::TwoFactorRequired);
        assert!(err.two_factor_required);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn oversized_images_are_413() {
        let err = ApiError::from(ImageError::TooLarge { max_mb: 5 });
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
