//! Schema application.
//!
//! Reads a script, splits it, and runs every statement in order over one
//! connection. Statement failures are reported and skipped; whatever
//! succeeded is committed once at the end.

use std::io::{self, Write};
use std::path::Path;

use async_trait::async_trait;

use crate::config::ApplyConfig;
use crate::db::{self, PgExecutor};
use crate::error::{Error, Result};
use crate::report::ProgressReporter;

/// Runs single SQL statements.
///
/// Futures are not `Send`: statements run one at a time on the caller's task.
#[async_trait(?Send)]
pub trait StatementExecutor {
    /// Execute one statement. A failure must leave previously executed
    /// statements in place so the run can continue.
    async fn execute(&mut self, sql: &str) -> std::result::Result<(), sqlx::Error>;
}

/// Outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Apply the schema described by `config`, writing progress to `out`.
///
/// Fails only on configuration-level problems: a missing or unreadable
/// schema file, an unreachable database, or a failed commit. Individual
/// statement errors are counted in the returned summary.
pub async fn apply_schema<W: Write>(config: &ApplyConfig, out: W) -> Result<ApplySummary> {
    let script = read_schema(&config.schema_path).await?;
    let statements = config.split_mode.split(&script);
    log::debug!(
        "Split {} into {} statements ({:?})",
        config.schema_path.display(),
        statements.len(),
        config.split_mode
    );

    let mut reporter = ProgressReporter::new(out, config.style);
    reporter.connecting()?;
    let mut conn = db::connect(&config.database_url).await?;
    reporter.connected(statements.len())?;

    let mut executor = PgExecutor::begin(&mut conn).await?;
    let summary = run_statements(&mut executor, &statements, &mut reporter).await?;
    executor.commit().await?;
    db::close(conn).await;

    log::info!(
        "Applied {} of {} statements ({} failed)",
        summary.succeeded,
        summary.attempted,
        summary.failed
    );
    reporter.applied()?;
    Ok(summary)
}

/// Execute `statements` in order, continuing past failures.
pub async fn run_statements<E, W>(
    executor: &mut E,
    statements: &[&str],
    reporter: &mut ProgressReporter<W>,
) -> io::Result<ApplySummary>
where
    E: StatementExecutor + ?Sized,
    W: Write,
{
    let total = statements.len();
    let mut summary = ApplySummary::default();

    for (index, statement) in statements.iter().enumerate() {
        let index = index + 1;
        reporter.executing(index, total, statement)?;
        log::debug!("Executing statement {index}/{total}: {statement}");

        summary.attempted += 1;
        match executor.execute(statement).await {
            Ok(()) => {
                summary.succeeded += 1;
                reporter.succeeded()?;
            }
            Err(e) => {
                log::warn!("Statement {index}/{total} failed: {e}");
                log::debug!("{e:?}");
                summary.failed += 1;
                reporter.failed(&e)?;
            }
        }
    }

    Ok(summary)
}

/// Read the whole schema file as UTF-8.
pub async fn read_schema(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Error::SchemaNotFound(path.to_path_buf()),
            _ => Error::ReadSchema {
                path: path.to_path_buf(),
                source,
            },
        })
}
