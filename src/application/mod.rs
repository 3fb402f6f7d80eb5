//! Application layer: use cases orchestrating domain repositories

pub mod activity;
pub mod cars;
pub mod fuel;
pub mod identity;
pub mod qr;
pub mod reports;
pub mod seed;
pub mod service_records;

pub use activity::{ActivityService, ActivityStats};
pub use cars::CarService;
pub use fuel::FuelService;
pub use identity::{TwoFactorService, UserService};
pub use reports::ReportService;
pub use service_records::ServiceRecordService;

/// The authenticated caller of a use case
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin,
        }
    }
}
