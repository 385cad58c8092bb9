//! PostgreSQL session used to apply a schema.
//!
//! One connection, one outer transaction, one savepoint per statement.

use async_trait::async_trait;
use sqlx::postgres::{PgConnection, Postgres};
use sqlx::{Connection, Transaction};

use crate::apply::StatementExecutor;
use crate::error::{Error, Result};

/// Open a single connection to the database at `url`.
pub async fn connect(url: &str) -> Result<PgConnection> {
    PgConnection::connect(url).await.map_err(Error::Connect)
}

/// Close the connection, logging rather than failing if the server is gone.
pub async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        log::warn!("Failed to close database connection: {e}");
    }
}

/// Executes statements inside one transaction that is committed once.
///
/// Every statement runs under its own savepoint. A failing statement is rolled
/// back to that savepoint, so the outer transaction stays usable and the
/// statements that did succeed are kept by [`PgExecutor::commit`].
pub struct PgExecutor<'c> {
    tx: Transaction<'c, Postgres>,
}

impl<'c> PgExecutor<'c> {
    /// Start the outer transaction on `conn`.
    pub async fn begin(conn: &'c mut PgConnection) -> Result<Self> {
        let tx = conn.begin().await.map_err(Error::Transaction)?;
        Ok(Self { tx })
    }

    /// Commit everything that succeeded.
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(Error::Transaction)
    }
}

#[async_trait(?Send)]
impl StatementExecutor for PgExecutor<'_> {
    async fn execute(&mut self, sql: &str) -> std::result::Result<(), sqlx::Error> {
        // Nested begin on a connection already in a transaction issues SAVEPOINT.
        let mut savepoint = Connection::begin(&mut *self.tx).await?;

        // Simple-query protocol: no prepared statement, so DDL and DO blocks run as written.
        match sqlx::raw_sql(sql).execute(&mut *savepoint).await {
            Ok(_) => savepoint.commit().await,
            Err(e) => {
                if let Err(rollback) = savepoint.rollback().await {
                    log::warn!("Failed to roll back to savepoint: {rollback}");
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database_url() -> String {
        std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database")
    }

    fn statement_executor<E: StatementExecutor>() {}

    #[test]
    fn pg_executor_drives_run_statements() {
        statement_executor::<PgExecutor<'static>>();
    }

    #[tokio::test]
    async fn connect_to_closed_port_fails() {
        let Err(err) = connect("postgres://pgschema@127.0.0.1:1/pgschema").await else {
            panic!("nothing should listen on port 1");
        };
        assert!(matches!(err, Error::Connect(_)));
        assert!(err.to_string().starts_with("Failed to connect to database"));
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server at DATABASE_URL"]
    async fn failed_statement_does_not_poison_transaction() -> Result<()> {
        let mut conn = connect(&database_url()).await?;
        let mut executor = PgExecutor::begin(&mut conn).await?;

        executor
            .execute("CREATE TEMP TABLE pgschema_scratch (id int PRIMARY KEY)")
            .await
            .expect("create table");
        executor
            .execute("INSERT INTO pgschema_scratch VALUES (1)")
            .await
            .expect("first insert");
        assert!(
            executor
                .execute("INSERT INTO pgschema_scratch VALUES (1)")
                .await
                .is_err()
        );
        executor
            .execute("INSERT INTO pgschema_scratch VALUES (2)")
            .await
            .expect("insert after failure");

        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM pgschema_scratch")
            .fetch_one(&mut *executor.tx)
            .await
            .map_err(Error::Transaction)?;
        assert_eq!(2, count);

        // Dropping the executor rolls the outer transaction back.
        drop(executor);
        close(conn).await;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server at DATABASE_URL"]
    async fn dollar_quoted_function_runs_as_one_statement() -> Result<()> {
        let mut conn = connect(&database_url()).await?;
        let mut executor = PgExecutor::begin(&mut conn).await?;

        executor
            .execute(
                "CREATE FUNCTION pg_temp.pgschema_scratch() RETURNS text AS $$ \
                 BEGIN RETURN 'a;b'; END; $$ LANGUAGE plpgsql",
            )
            .await
            .expect("create function");

        let value: String = sqlx::query_scalar("SELECT pg_temp.pgschema_scratch()")
            .fetch_one(&mut *executor.tx)
            .await
            .map_err(Error::Transaction)?;
        assert_eq!("a;b", value);

        drop(executor);
        close(conn).await;
        Ok(())
    }
}
