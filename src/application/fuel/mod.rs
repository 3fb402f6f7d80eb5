//! Fuel tracker use cases

pub mod service;

pub use service::FuelService;
