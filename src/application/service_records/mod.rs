//! Service record use cases

pub mod service;

pub use service::{CarRef, ServiceRecordService, ServiceWithCar};
