//! Service record aggregate (maintenance history of a car)

pub mod model;
pub mod repository;

pub use model::{
    validate_new_service, validate_service_update, CreateServiceDto, ServiceRecord, ServiceType,
    UpdateServiceDto,
};
pub use repository::ServiceRecordRepository;
