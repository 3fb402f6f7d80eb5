//! Sample data loader behind `--seed`

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use tracing::info;

use crate::application::UserService;
use crate::domain::car::CreateCarDto;
use crate::domain::service_record::{CreateServiceDto, ServiceType};
use crate::domain::{DomainResult, RepositoryProvider, UserRole};

pub const SEED_PASSWORD: &str = "password123";

const USERS: &[(&str, &str, UserRole)] = &[
    ("John Smith", "john@example.com", UserRole::Admin),
    ("Alice Johnson", "alice@example.com", UserRole::User),
    ("Bob Wilson", "bob@example.com", UserRole::User),
    ("Sarah Davis", "sarah@example.com", UserRole::User),
    ("Mike Brown", "mike@example.com", UserRole::User),
];

struct SampleCar {
    brand: &'static str,
    model: &'static str,
    year: i32,
    price: f64,
    color: &'static str,
    mileage: i64,
    description: &'static str,
}

const CARS: &[SampleCar] = &[
    SampleCar { brand: "Toyota", model: "Camry", year: 2020, price: 25000.0, color: "Silver", mileage: 35000, description: "Well-maintained family sedan with excellent fuel economy." },
    SampleCar { brand: "Honda", model: "Civic", year: 2019, price: 22000.0, color: "Blue", mileage: 42000, description: "Reliable compact car perfect for city driving." },
    SampleCar { brand: "BMW", model: "X5", year: 2021, price: 55000.0, color: "Black", mileage: 18000, description: "Luxury SUV with advanced technology and premium features." },
    SampleCar { brand: "Ford", model: "F-150", year: 2020, price: 45000.0, color: "White", mileage: 28000, description: "Powerful pickup truck ideal for work and recreation." },
    SampleCar { brand: "Tesla", model: "Model 3", year: 2022, price: 48000.0, color: "Red", mileage: 12000, description: "Electric vehicle with cutting-edge technology and autopilot features." },
    SampleCar { brand: "Mercedes-Benz", model: "C-Class", year: 2021, price: 42000.0, color: "Gray", mileage: 15000, description: "Luxury sedan with premium interior and smooth ride." },
    SampleCar { brand: "Nissan", model: "Altima", year: 2019, price: 19000.0, color: "White", mileage: 38000, description: "Comfortable midsize sedan with good reliability." },
    SampleCar { brand: "Audi", model: "A4", year: 2020, price: 38000.0, color: "Black", mileage: 22000, description: "German engineering meets luxury and performance." },
];

const SERVICES: &[(&str, f64, ServiceType, &str)] = &[
    ("Regular oil change and filter replacement", 75.0, ServiceType::Maintenance, "Quick Lube Express"),
    ("Brake pad replacement and rotor resurfacing", 350.0, ServiceType::Repair, "Auto Repair Center"),
    ("Annual safety inspection", 45.0, ServiceType::Inspection, "State Inspection Station"),
    ("Transmission fluid change", 120.0, ServiceType::Maintenance, "Transmission Specialists"),
    ("Air conditioning system repair", 280.0, ServiceType::Repair, "AC Pro Services"),
    ("Tire rotation and alignment", 85.0, ServiceType::Maintenance, "Tire World"),
    ("Battery replacement", 150.0, ServiceType::Repair, "Battery Plus"),
    ("Spark plug replacement", 95.0, ServiceType::Maintenance, "Engine Masters"),
    ("Windshield replacement", 400.0, ServiceType::Repair, "Glass Doctor"),
    ("Emissions testing", 25.0, ServiceType::Inspection, "Emissions Testing Center"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub cars: usize,
    pub services: usize,
}

/// Wipe every table and load the sample fleet. Cars go round-robin to the
/// users, services round-robin to the cars, dated within the past year.
pub async fn seed_database(
    repos: Arc<dyn RepositoryProvider>,
    users: &UserService,
) -> DomainResult<SeedSummary> {
    info!("Clearing existing data");
    repos.cars().delete_all().await?;
    repos.users().delete_all().await?;
    repos.activities().delete_all().await?;

    let mut user_ids = Vec::with_capacity(USERS.len());
    for (name, email, role) in USERS {
        let user = users
            .create_account(name, email, SEED_PASSWORD, *role)
            .await?;
        info!(email = %user.email, role = user.role.as_str(), "Seeded user");
        user_ids.push(user.id);
    }

    let mut car_ids = Vec::with_capacity(CARS.len());
    for (i, sample) in CARS.iter().enumerate() {
        let car = repos
            .cars()
            .create(CreateCarDto {
                brand: sample.brand.into(),
                model: sample.model.into(),
                year: sample.year,
                price: sample.price,
                color: Some(sample.color.into()),
                mileage: Some(sample.mileage),
                description: Some(sample.description.into()),
                image: None,
                owner_id: user_ids[i % user_ids.len()].clone(),
            })
            .await?;
        info!(car = %car.display_name(), "Seeded car");
        car_ids.push(car.id);
    }

    let year_secs = 365 * 24 * 60 * 60;
    let offsets: Vec<i64> = {
        let mut rng = rand::thread_rng();
        (0..SERVICES.len())
            .map(|_| rng.gen_range(0..year_secs))
            .collect()
    };
    let now = Utc::now();
    for (i, (description, cost, service_type, provider)) in SERVICES.iter().enumerate() {
        repos
            .services()
            .create(CreateServiceDto {
                car_id: car_ids[i % car_ids.len()].clone(),
                description: description.to_string(),
                cost: *cost,
                service_type: *service_type,
                service_provider: Some(provider.to_string()),
                date: now - Duration::seconds(offsets[i]),
            })
            .await?;
    }

    let summary = SeedSummary {
        users: user_ids.len(),
        cars: car_ids.len(),
        services: SERVICES.len(),
    };
    info!(
        users = summary.users,
        cars = summary.cars,
        services = summary.services,
        "Database seeded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;

    #[tokio::test]
    async fn seeding_replaces_existing_data() {
        let ctx = TestContext::new().await;
        let stranger = ctx.user("stranger@example.com").await;
        ctx.car(&stranger).await;

        let summary = seed_database(ctx.repos.clone(), &ctx.state.user_service)
            .await
            .unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                users: 5,
                cars: 8,
                services: 10
            }
        );

        let users = ctx.repos.users();
        assert!(users
            .get_user_by_email("stranger@example.com")
            .await
            .unwrap()
            .is_none());
        let john = users
            .get_user_by_email("john@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(john.is_admin());

        // 8 cars over 5 users: the first three get two each
        assert_eq!(ctx.repos.cars().list(Some(&john.id)).await.unwrap().len(), 2);
        let services = ctx.repos.services().list_all().await.unwrap();
        assert_eq!(services.len(), 10);
        let cutoff = Utc::now() - Duration::days(366);
        assert!(services.iter().all(|s| s.date > cutoff));
    }
}
