//! In-memory fixtures shared by unit tests

use std::sync::Arc;

use crate::application::Actor;
use crate::config::{AppConfig, UploadMode};
use crate::domain::car::CreateCarDto;
use crate::domain::{RepositoryProvider, UserRole};
use crate::infrastructure::{init_database, run_migrations, DatabaseConfig};
use crate::interfaces::http::state::AppState;

pub struct TestContext {
    pub state: AppState,
    pub repos: Arc<dyn RepositoryProvider>,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.security.jwt_secret = "test-secret-for-car-management".into();
    config.security.bcrypt_cost = 4;
    config.uploads.mode = UploadMode::Inline;
    config.server.public_base_url = "http://cars.test".into();
    config
}

impl TestContext {
    pub async fn new() -> Self {
        let db = init_database(&DatabaseConfig::in_memory())
            .await
            .expect("in-memory database");
        run_migrations(&db).await.expect("migrations");

        let state = AppState::new(db, &test_config());
        Self {
            repos: state.repos.clone(),
            state,
        }
    }

    /// Register a regular user and return it as an actor.
    pub async fn user(&self, email: &str) -> Actor {
        let auth = self
            .state
            .user_service
            .register("Test User", email, "password123")
            .await
            .expect("register user");
        Actor::new(auth.user.id, false)
    }

    pub async fn admin(&self, email: &str) -> Actor {
        let user = self
            .state
            .user_service
            .create_account("Test Admin", email, "password123", UserRole::Admin)
            .await
            .expect("create admin");
        Actor::new(user.id, true)
    }

    /// Register a regular user and return a bearer token for it.
    pub async fn token(&self, email: &str) -> String {
        self.state
            .user_service
            .register("Test User", email, "password123")
            .await
            .expect("register user")
            .token
    }

    /// Bearer token for an existing account.
    pub async fn login(&self, email: &str) -> String {
        self.state
            .user_service
            .login(email, "password123", None)
            .await
            .expect("login")
            .token
    }

    /// Create a car owned by `owner` and return its id.
    pub async fn car(&self, owner: &Actor) -> String {
        self.state
            .car_service
            .create(
                owner,
                CreateCarDto {
                    brand: "Toyota".into(),
                    model: "Corolla".into(),
                    year: 2018,
                    price: 15000.0,
                    color: Some("White".into()),
                    mileage: Some(60000),
                    description: None,
                    image: None,
                    owner_id: String::new(),
                },
                None,
            )
            .await
            .expect("create car")
            .car
            .id
    }
}
