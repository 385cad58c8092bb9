//! Schema application configuration.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::report::ReportStyle;
use crate::split::SplitMode;

/// Schema file used when no path is given, relative to the working directory.
pub const DEFAULT_SCHEMA_PATH: &str = "database/schema_postgres.sql";

/// Everything needed to apply one schema file.
#[derive(Clone, Debug)]
pub struct ApplyConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Path to the SQL script.
    pub schema_path: PathBuf,
    /// How the script is cut into statements.
    pub split_mode: SplitMode,
    /// Amount of progress output.
    pub style: ReportStyle,
}

impl ApplyConfig {
    /// Build a config from an optional connection string.
    ///
    /// A missing or blank connection string is a configuration error.
    pub fn new(database_url: Option<String>, schema_path: PathBuf) -> Result<Self> {
        Ok(Self {
            database_url: resolve_database_url(database_url)?,
            schema_path,
            split_mode: SplitMode::default(),
            style: ReportStyle::default(),
        })
    }

    pub fn with_split_mode(mut self, split_mode: SplitMode) -> Self {
        self.split_mode = split_mode;
        self
    }

    pub fn with_style(mut self, style: ReportStyle) -> Self {
        self.style = style;
        self
    }
}

/// Reject a missing or whitespace-only connection string.
pub fn resolve_database_url(value: Option<String>) -> Result<String> {
    match value {
        Some(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(Error::MissingDatabaseUrl),
    }
}
