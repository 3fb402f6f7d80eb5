//! Report handlers
//!
//! Every report takes `?format=pdf|xlsx|json` (default `pdf`) and is sent
//! as an attachment.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::application::reports::{RenderedReport, ReportFormat, ReportKind};
use crate::application::{ActivityService, ReportService};
use crate::domain::activity::{ActivityAction, EntityType, NewActivity};
use crate::interfaces::http::common::{ApiError, RequestMeta};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct ReportHandlerState {
    pub reports: Arc<ReportService>,
    pub activities: Arc<ActivityService>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FormatParams {
    /// `pdf` (default), `xlsx` or `json`
    pub format: Option<String>,
}

impl FormatParams {
    fn format(&self) -> Result<ReportFormat, ApiError> {
        match self.format.as_deref() {
            None | Some("") => Ok(ReportFormat::Pdf),
            Some(s) => s.parse::<ReportFormat>().map_err(|_| {
                ApiError::bad_request(format!(
                    "Unsupported report format '{}', use pdf, xlsx or json",
                    s
                ))
            }),
        }
    }
}

fn attachment(report: RenderedReport) -> Response {
    (
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name),
            ),
        ],
        report.bytes,
    )
        .into_response()
}

async fn generate(
    state: &ReportHandlerState,
    user: &AuthenticatedUser,
    meta: &RequestMeta,
    kind: ReportKind,
    params: &FormatParams,
) -> Result<Response, ApiError> {
    let format = params.format()?;
    let entity_id = match &kind {
        ReportKind::ServiceHistory { car_id } => Some(car_id.clone()),
        _ => None,
    };
    let report = state.reports.generate(&user.actor(), kind, format).await?;

    let mut activity = NewActivity::new(ActivityAction::GenerateReport, EntityType::Report)
        .by(user.user_id.clone())
        .details(json!({ "file": report.file_name, "format": format.extension() }));
    if let Some(id) = entity_id {
        activity = activity.entity(id);
    }
    state.activities.record_quietly(meta.stamp(activity)).await;

    Ok(attachment(report))
}

#[utoipa::path(
    get,
    path = "/api/reports/cars",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(FormatParams),
    responses(
        (status = 200, description = "All cars visible to the caller"),
        (status = 400, description = "Unsupported format")
    )
)]
pub async fn cars_report(
    State(state): State<ReportHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    meta: RequestMeta,
    Query(params): Query<FormatParams>,
) -> Result<Response, ApiError> {
    generate(&state, &user, &meta, ReportKind::AllCars, &params).await
}

#[utoipa::path(
    get,
    path = "/api/reports/cars/{id}/services",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Car ID"),
        FormatParams
    ),
    responses(
        (status = 200, description = "Service history of one car"),
        (status = 403, description = "Not the car's owner"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn service_history_report(
    State(state): State<ReportHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(car_id): Path<String>,
    meta: RequestMeta,
    Query(params): Query<FormatParams>,
) -> Result<Response, ApiError> {
    generate(
        &state,
        &user,
        &meta,
        ReportKind::ServiceHistory { car_id },
        &params,
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/reports/maintenance/monthly",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(FormatParams),
    responses(
        (status = 200, description = "Service costs grouped by month")
    )
)]
pub async fn monthly_maintenance_report(
    State(state): State<ReportHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    meta: RequestMeta,
    Query(params): Query<FormatParams>,
) -> Result<Response, ApiError> {
    generate(&state, &user, &meta, ReportKind::MonthlyMaintenance, &params).await
}
