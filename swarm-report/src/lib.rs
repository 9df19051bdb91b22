//! Read-only reports over a swarm-sync manifest.

pub mod csv_report;
pub mod error;
pub mod html;

pub use error::{ReportError, Result};
