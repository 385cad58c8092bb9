use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pgschema_core::config::DEFAULT_SCHEMA_PATH;
use pgschema_core::{ReportStyle, SplitMode};

/// Apply a PostgreSQL schema file statement by statement.
#[derive(Parser, Debug)]
#[command(name = "pgschema", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute every statement of the schema file, continuing past failures.
    Apply(ApplyArgs),
    /// Print the statements the schema file splits into without connecting.
    Split(SchemaArgs),
    /// Print version information.
    Version,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Path to the SQL schema file.
    #[arg(long, env = "SCHEMA_PATH", default_value = DEFAULT_SCHEMA_PATH)]
    pub schema: PathBuf,

    /// How statements are separated.
    #[arg(long, value_enum, default_value_t = Splitter::DollarQuoted)]
    pub splitter: Splitter,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Only print failed statements and the final summary.
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl ApplyArgs {
    pub fn style(&self) -> ReportStyle {
        if self.quiet {
            ReportStyle::Terse
        } else {
            ReportStyle::Verbose
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Splitter {
    /// Split on every semicolon
    Naive,
    /// Keep semicolons inside $tag$ ... $tag$ blocks
    DollarQuoted,
}

impl From<Splitter> for SplitMode {
    fn from(value: Splitter) -> Self {
        match value {
            Splitter::Naive => SplitMode::Naive,
            Splitter::DollarQuoted => SplitMode::DollarQuoted,
        }
    }
}
