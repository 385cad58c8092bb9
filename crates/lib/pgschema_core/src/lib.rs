//! # pgschema_core
//!
//! Split PostgreSQL schema scripts into statements and apply them one by one.

pub mod apply;
pub mod config;
pub mod db;
pub mod error;
pub mod report;
pub mod split;

pub use apply::{ApplySummary, StatementExecutor, apply_schema, run_statements};
pub use config::ApplyConfig;
pub use error::{Error, Result};
pub use report::{ProgressReporter, ReportStyle};
pub use split::{SplitMode, split_naive, split_statements};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
