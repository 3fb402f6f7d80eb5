pub mod activities;
pub mod cars;
pub mod fuel;
pub mod health;
pub mod metrics;
pub mod reports;
pub mod request_id;
pub mod services;
pub mod two_factor;
pub mod users;
