pub mod models;

pub use models::{Report, ReportDetails, ReportKind, ReportRow, UnknownReportKind};
