//! Identity module: user management & authentication
//!
//! `UserService` covers registration, login and profiles;
//! `TwoFactorService` handles TOTP enrolment.

pub mod service;
pub mod two_factor;

pub use service::{AuthResult, ProfileUpdate, UserService};
pub use two_factor::{TwoFactorService, TwoFactorSetup, TwoFactorVerification};
