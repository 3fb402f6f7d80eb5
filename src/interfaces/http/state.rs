//! Shared router state
//!
//! One [`AppState`] is built at startup; each handler module pulls the
//! slice it needs through `FromRef`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;

use crate::application::{
    ActivityService, CarService, FuelService, ReportService, ServiceRecordService,
    TwoFactorService, UserService,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::{ImageStore, SeaOrmRepositoryProvider};
use crate::interfaces::http::middleware::AuthState;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub auth: AuthState,
    pub images: ImageStore,
    pub user_service: Arc<UserService>,
    pub two_factor_service: Arc<TwoFactorService>,
    pub car_service: Arc<CarService>,
    pub service_record_service: Arc<ServiceRecordService>,
    pub fuel_service: Arc<FuelService>,
    pub activity_service: Arc<ActivityService>,
    pub report_service: Arc<ReportService>,
    pub metrics: Option<PrometheusHandle>,
    pub started_at: Arc<Instant>,
}

impl AppState {
    /// Wire every application service on top of `db`.
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let jwt_config = JwtConfig::from_security(&config.security);
        let images = ImageStore::new(&config.uploads);

        let service_record_service = Arc::new(ServiceRecordService::new(repos.clone()));
        let car_service = Arc::new(CarService::new(
            repos.clone(),
            images.clone(),
            config.server.public_base_url.clone(),
        ));

        Self {
            db,
            auth: AuthState {
                jwt_config: jwt_config.clone(),
            },
            images,
            user_service: Arc::new(UserService::new(
                repos.clone(),
                jwt_config,
                config.security.bcrypt_cost,
            )),
            two_factor_service: Arc::new(TwoFactorService::new(repos.clone())),
            fuel_service: Arc::new(FuelService::new(repos.clone())),
            activity_service: Arc::new(ActivityService::new(repos.clone())),
            report_service: Arc::new(ReportService::new(
                repos.clone(),
                car_service.clone(),
                service_record_service.clone(),
            )),
            car_service,
            service_record_service,
            repos,
            metrics: None,
            started_at: Arc::new(Instant::now()),
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        s.auth.clone()
    }
}
