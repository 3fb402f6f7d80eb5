use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use super::model::{
    all_cars_report, monthly_report, service_history_report, Report, ReportFormat, ReportKind,
};
use super::{excel, pdf};
use crate::application::{Actor, CarService, ServiceRecordService};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("Excel rendering failed: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<printpdf::Error> for ReportError {
    fn from(e: printpdf::Error) -> Self {
        ReportError::Pdf(e.to_string())
    }
}

impl From<ReportError> for DomainError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Domain(inner) => inner,
            other => DomainError::Internal(other.to_string()),
        }
    }
}

/// A finished download
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

pub struct ReportService {
    repos: Arc<dyn RepositoryProvider>,
    cars: Arc<CarService>,
    services: Arc<ServiceRecordService>,
}

impl ReportService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        cars: Arc<CarService>,
        services: Arc<ServiceRecordService>,
    ) -> Self {
        Self {
            repos,
            cars,
            services,
        }
    }

    /// Collect the rows `actor` may see for `kind`.
    pub async fn build(&self, actor: &Actor, kind: &ReportKind) -> DomainResult<Report> {
        let now = Utc::now();
        match kind {
            ReportKind::AllCars => {
                let cars = if actor.is_admin {
                    self.cars.list().await?
                } else {
                    self.cars.list_for_owner(&actor.user_id).await?
                };
                Ok(all_cars_report(&cars, now))
            }
            ReportKind::ServiceHistory { car_id } => {
                let car = self
                    .cars
                    .find_owned(actor, car_id, "view reports for")
                    .await?;
                let services = self.repos.services().list_for_car(&car.id).await?;
                let details = self.cars.with_details(vec![car]).await?;
                let details = details
                    .first()
                    .ok_or_else(|| DomainError::Internal("Car details went missing".into()))?;
                Ok(service_history_report(details, &services, now))
            }
            ReportKind::MonthlyMaintenance => {
                let services = self.services.list_visible(actor).await?;
                Ok(monthly_report(&services, now))
            }
        }
    }

    pub fn render(
        report: &Report,
        kind: &ReportKind,
        format: ReportFormat,
    ) -> Result<RenderedReport, ReportError> {
        let bytes = match format {
            ReportFormat::Pdf => pdf::render(report)?,
            ReportFormat::Xlsx => excel::render(report)?,
            ReportFormat::Json => serde_json::to_vec_pretty(report)?,
        };
        Ok(RenderedReport {
            bytes,
            content_type: format.content_type(),
            file_name: format!("{}.{}", kind.file_stem(), format.extension()),
        })
    }

    pub async fn generate(
        &self,
        actor: &Actor,
        kind: ReportKind,
        format: ReportFormat,
    ) -> Result<RenderedReport, ReportError> {
        let report = self.build(actor, &kind).await?;
        let rendered = Self::render(&report, &kind, format)?;
        info!(
            user_id = %actor.user_id,
            file = %rendered.file_name,
            rows = report.rows.len(),
            bytes = rendered.bytes.len(),
            "Report generated"
        );
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service_record::{CreateServiceDto, ServiceType};
    use crate::test_support::TestContext;

    async fn add_service(ctx: &TestContext, car_id: &str, cost: f64) {
        ctx.repos
            .services()
            .create(CreateServiceDto {
                car_id: car_id.to_string(),
                description: "Oil change".into(),
                cost,
                service_type: ServiceType::Maintenance,
                service_provider: None,
                date: Utc::now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn users_only_see_their_own_cars() {
        let ctx = TestContext::new().await;
        let alice = ctx.user("alice@example.com").await;
        let bob = ctx.user("bob@example.com").await;
        let admin = ctx.admin("root@example.com").await;
        ctx.car(&alice).await;
        ctx.car(&bob).await;

        let reports = &ctx.state.report_service;
        let own = reports.build(&alice, &ReportKind::AllCars).await.unwrap();
        assert_eq!(own.rows.len(), 1);
        let all = reports.build(&admin, &ReportKind::AllCars).await.unwrap();
        assert_eq!(all.rows.len(), 2);
    }

    #[tokio::test]
    async fn service_history_requires_ownership() {
        let ctx = TestContext::new().await;
        let alice = ctx.user("alice@example.com").await;
        let bob = ctx.user("bob@example.com").await;
        let car_id = ctx.car(&alice).await;
        add_service(&ctx, &car_id, 40.0).await;

        let kind = ReportKind::ServiceHistory {
            car_id: car_id.clone(),
        };
        let reports = &ctx.state.report_service;
        let report = reports.build(&alice, &kind).await.unwrap();
        assert_eq!(report.rows.len(), 1);

        let err = reports.build(&bob, &kind).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn monthly_report_is_scoped_to_visible_services() {
        let ctx = TestContext::new().await;
        let alice = ctx.user("alice@example.com").await;
        let bob = ctx.user("bob@example.com").await;
        let alice_car = ctx.car(&alice).await;
        let bob_car = ctx.car(&bob).await;
        add_service(&ctx, &alice_car, 10.0).await;
        add_service(&ctx, &bob_car, 25.0).await;

        let report = ctx
            .state
            .report_service
            .build(&alice, &ReportKind::MonthlyMaintenance)
            .await
            .unwrap();
        assert_eq!(report.rows.len(), 1);
        assert!(report
            .summary
            .iter()
            .any(|(_, value)| value == "$10.00"));
    }

    #[tokio::test]
    async fn generate_names_the_download() {
        let ctx = TestContext::new().await;
        let alice = ctx.user("alice@example.com").await;
        let rendered = ctx
            .state
            .report_service
            .generate(&alice, ReportKind::AllCars, ReportFormat::Xlsx)
            .await
            .unwrap();
        assert_eq!(rendered.file_name, "all-cars-report.xlsx");
        assert!(rendered.bytes.starts_with(b"PK"));
    }
}
