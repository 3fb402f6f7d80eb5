//! Activity log aggregate

pub mod model;
pub mod repository;

pub use model::{
    Activity, ActivityAction, ActivityCount, ActivityFilter, EntityType, NewActivity,
};
pub use repository::ActivityRepository;
