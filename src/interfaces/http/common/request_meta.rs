//! Request metadata stored on activity records

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;

use crate::domain::activity::NewActivity;

/// `User-Agent` and request path of the current call
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub user_agent: Option<String>,
    pub url: Option<String>,
}

impl RequestMeta {
    /// Attach this request's metadata to an activity.
    pub fn stamp(&self, mut activity: NewActivity) -> NewActivity {
        activity.user_agent = self.user_agent.clone();
        activity.url = self.url.clone();
        activity
    }
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string());
        Ok(Self { user_agent, url })
    }
}
