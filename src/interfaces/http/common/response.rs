//! Response envelopes
//!
//! Every endpoint answers with `{success, message?, count?, data?}`.
//! Failures carry `success: false` and a `message`, see [`super::ApiError`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::PaginatedResult;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of items when `data` is a list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: Some(data),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: Some(items.len()),
            data: Some(items),
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload, e.g. "Car deleted successfully".
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: None,
        }
    }
}

/// A page of a longer list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    /// Items on this page
    pub count: usize,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub data: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn from_result<U>(result: PaginatedResult<U>, map: impl FnMut(U) -> T) -> Self {
        let data: Vec<T> = result.items.into_iter().map(map).collect();
        Self {
            success: true,
            count: data.len(),
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_carries_count() {
        let body = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 3);
        assert!(body.get("message").is_none());
    }

    #[test]
    fn message_only_envelope_has_no_data() {
        let body = serde_json::to_value(ApiResponse::message("Car deleted successfully")).unwrap();
        assert_eq!(body["message"], "Car deleted successfully");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn pages_are_mapped() {
        let page = PaginatedResult::new(vec![1u32, 2], 5, 1, 2);
        let resp = PaginatedResponse::from_result(page, |n| n * 10);
        assert_eq!(resp.data, vec![10, 20]);
        assert_eq!(resp.count, 2);
        assert_eq!(resp.total_pages, 3);
    }
}
