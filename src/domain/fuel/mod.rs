//! Fuel tracker: refuelling entries per car and efficiency statistics

pub mod model;
pub mod repository;
pub mod stats;

pub use model::{validate_fuel_entry, CreateFuelEntryDto, FuelEntry, FuelType};
pub use repository::FuelEntryRepository;
pub use stats::{EfficiencyRating, FuelStats};
