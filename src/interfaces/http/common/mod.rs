//! Building blocks shared by every HTTP module

pub mod error;
pub mod request_meta;
pub mod response;
pub mod validated_json;

pub use error::ApiError;
pub use request_meta::RequestMeta;
pub use response::{ApiResponse, PaginatedResponse};
pub use validated_json::ValidatedJson;
