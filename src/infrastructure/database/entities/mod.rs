//! Database entities module

pub mod activity;
pub mod car;
pub mod fuel_entry;
pub mod service;
pub mod user;

pub use activity::Entity as Activity;
pub use car::Entity as Car;
pub use fuel_entry::Entity as FuelEntry;
pub use service::Entity as Service;
pub use user::Entity as User;
