//! Report generation: tabular models rendered as PDF, Excel or JSON

pub mod excel;
pub mod model;
pub mod pdf;
pub mod service;

pub use model::{monthly_summary, Cell, MonthlyBucket, Report, ReportFormat, ReportKind};
pub use service::{RenderedReport, ReportError, ReportService};
