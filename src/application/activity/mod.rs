//! Activity log use cases

pub mod service;

pub use service::{ActivityService, ActivityStats};
