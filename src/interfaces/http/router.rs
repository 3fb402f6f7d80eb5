//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::interfaces::http::common::{ApiError, ApiResponse, PaginatedResponse};
use crate::interfaces::http::middleware::{admin_middleware, auth_middleware};
use crate::interfaces::http::modules::{
    activities, cars, fuel, health, metrics, reports, request_id, services, two_factor, users,
};
use crate::interfaces::http::state::AppState;

/// Multipart framing and text fields on top of the image itself
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for users::UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        users::UserHandlerState {
            users: Arc::clone(&s.user_service),
            activities: Arc::clone(&s.activity_service),
        }
    }
}

impl FromRef<AppState> for two_factor::TwoFactorHandlerState {
    fn from_ref(s: &AppState) -> Self {
        two_factor::TwoFactorHandlerState {
            two_factor: Arc::clone(&s.two_factor_service),
        }
    }
}

impl FromRef<AppState> for cars::CarHandlerState {
    fn from_ref(s: &AppState) -> Self {
        cars::CarHandlerState {
            cars: Arc::clone(&s.car_service),
            activities: Arc::clone(&s.activity_service),
        }
    }
}

impl FromRef<AppState> for services::ServiceHandlerState {
    fn from_ref(s: &AppState) -> Self {
        services::ServiceHandlerState {
            services: Arc::clone(&s.service_record_service),
            activities: Arc::clone(&s.activity_service),
        }
    }
}

impl FromRef<AppState> for fuel::FuelHandlerState {
    fn from_ref(s: &AppState) -> Self {
        fuel::FuelHandlerState {
            fuel: Arc::clone(&s.fuel_service),
            activities: Arc::clone(&s.activity_service),
        }
    }
}

impl FromRef<AppState> for activities::ActivityHandlerState {
    fn from_ref(s: &AppState) -> Self {
        activities::ActivityHandlerState {
            activities: Arc::clone(&s.activity_service),
        }
    }
}

impl FromRef<AppState> for reports::ReportHandlerState {
    fn from_ref(s: &AppState) -> Self {
        reports::ReportHandlerState {
            reports: Arc::clone(&s.report_service),
            activities: Arc::clone(&s.activity_service),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/users/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::root,
        health::health_check,
        // Users
        users::register,
        users::login,
        users::get_profile,
        users::update_profile,
        users::list_users,
        // Two-factor
        two_factor::setup,
        two_factor::verify,
        two_factor::disable,
        // Cars
        cars::list_cars,
        cars::my_cars,
        cars::get_car,
        cars::create_car,
        cars::update_car,
        cars::delete_car,
        cars::compare_cars,
        cars::car_qr,
        // Fuel
        fuel::list_fuel_entries,
        fuel::add_fuel_entry,
        fuel::delete_fuel_entry,
        fuel::fuel_stats,
        // Services
        services::list_all_services,
        services::create_service,
        services::list_car_services,
        services::update_service,
        services::delete_service,
        // Activities
        activities::record_activity,
        activities::list_activities,
        activities::activity_stats,
        // Reports
        reports::cars_report,
        reports::service_history_report,
        reports::monthly_maintenance_report,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<users::UserDto>,
            PaginatedResponse<activities::ActivityDto>,
            // Users
            users::UserDto,
            users::AuthResponse,
            users::RegisterRequest,
            users::LoginRequest,
            users::UpdateProfileRequest,
            // Two-factor
            two_factor::TwoFactorSetupResponse,
            two_factor::VerifyCodeRequest,
            two_factor::TwoFactorVerifyResponse,
            two_factor::DisableTwoFactorRequest,
            // Cars
            cars::CarDto,
            cars::OwnerDto,
            cars::CarFields,
            cars::CarComparisonDto,
            cars::FieldComparisonDto,
            cars::ServiceSummaryDto,
            // Fuel
            fuel::FuelEntryDto,
            fuel::CreateFuelEntryRequest,
            fuel::FuelStatsDto,
            // Services
            services::ServiceDto,
            services::CarRefDto,
            services::ServiceWithCarDto,
            services::CreateServiceRequest,
            services::UpdateServiceRequest,
            // Activities
            activities::ActivityDto,
            activities::RecordActivityRequest,
            activities::ActivityStatsDto,
            activities::ActionCountDto,
            activities::UserCountDto,
            // Health
            health::RootResponse,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness banner and health check"),
        (name = "Users", description = "Registration, login (JWT), profile and the admin user list"),
        (name = "Two-Factor", description = "TOTP enrolment, verification and backup codes"),
        (name = "Cars", description = "Car inventory, comparison and QR summaries"),
        (name = "Fuel", description = "Fuel entries and efficiency statistics per car"),
        (name = "Services", description = "Maintenance history of cars"),
        (name = "Activities", description = "Audit log of user actions"),
        (name = "Reports", description = "PDF, Excel and JSON reports"),
    ),
    info(
        title = "Car Management System API",
        version = "1.0.0",
        description = "REST API for a car inventory with maintenance tracking",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let auth_state = state.auth.clone();
    let require_auth = || middleware::from_fn_with_state(auth_state.clone(), auth_middleware);
    let require_admin = || middleware::from_fn(admin_middleware);

    // ── Users ───────────────────────────────────────────────────
    let user_public = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login));

    let user_protected = Router::new()
        .route(
            "/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .layer(require_auth());

    let user_admin = Router::new()
        .route("/", get(users::list_users))
        .layer(require_admin())
        .layer(require_auth());

    // ── Two-factor (protected) ──────────────────────────────────
    let two_factor_routes = Router::new()
        .route("/setup", post(two_factor::setup))
        .route("/verify", post(two_factor::verify))
        .route("/disable", post(two_factor::disable))
        .layer(require_auth());

    // ── Cars ────────────────────────────────────────────────────
    let car_public = Router::new()
        .route("/", get(cars::list_cars))
        .route("/compare", get(cars::compare_cars))
        .route("/{id}", get(cars::get_car))
        .route("/{id}/qr", get(cars::car_qr));

    let car_protected = Router::new()
        .route("/", post(cars::create_car))
        .route("/my-cars", get(cars::my_cars))
        .route("/{id}", axum::routing::put(cars::update_car).delete(cars::delete_car))
        .layer(DefaultBodyLimit::max(
            state.images.max_bytes() + BODY_LIMIT_SLACK,
        ))
        .layer(require_auth());

    // ── Fuel (protected, under /api/cars/{id}) ──────────────────
    let fuel_routes = Router::new()
        .route(
            "/{id}/fuel-entries",
            get(fuel::list_fuel_entries).post(fuel::add_fuel_entry),
        )
        .route("/{id}/fuel-entries/stats", get(fuel::fuel_stats))
        .route(
            "/{id}/fuel-entries/{entry_id}",
            delete(fuel::delete_fuel_entry),
        )
        .layer(require_auth());

    // ── Services ────────────────────────────────────────────────
    let service_protected = Router::new()
        .route("/", post(services::create_service))
        .route(
            "/{id}",
            get(services::list_car_services)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        .layer(require_auth());

    let service_admin = Router::new()
        .route("/", get(services::list_all_services))
        .layer(require_admin())
        .layer(require_auth());

    // ── Activities ──────────────────────────────────────────────
    let activity_protected = Router::new()
        .route("/", post(activities::record_activity))
        .layer(require_auth());

    let activity_admin = Router::new()
        .route("/", get(activities::list_activities))
        .route("/stats", get(activities::activity_stats))
        .layer(require_admin())
        .layer(require_auth());

    // ── Reports (protected) ─────────────────────────────────────
    let report_routes = Router::new()
        .route("/cars", get(reports::cars_report))
        .route("/cars/{id}/services", get(reports::service_history_report))
        .route(
            "/maintenance/monthly",
            get(reports::monthly_maintenance_report),
        )
        .layer(require_auth());

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let uploads = ServeDir::new(state.images.root().to_path_buf());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health and metrics
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        // Users
        .nest("/api/users", user_public)
        .nest("/api/users", user_protected)
        .nest("/api/users", user_admin)
        .nest("/api/auth/2fa", two_factor_routes)
        // Cars and fuel
        .nest("/api/cars", car_public)
        .nest("/api/cars", car_protected)
        .nest("/api/cars", fuel_routes)
        // Services
        .nest("/api/services", service_protected)
        .nest("/api/services", service_admin)
        // Activities
        .nest("/api/activities", activity_protected)
        .nest("/api/activities", activity_admin)
        // Reports
        .nest("/api/reports", report_routes)
        // Uploaded images
        .nest_service("/uploads", uploads)
        .fallback(route_not_found)
        .with_state(state)
        // Middleware
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
