//! Car use cases: CRUD with ownership checks, comparison and QR summaries

pub mod comparison;
pub mod qr_summary;
pub mod service;

pub use comparison::{CarComparison, FieldComparison, ServiceSummary, Verdict};
pub use qr_summary::QrPayload;
pub use service::{CarService, CarWriteError};
