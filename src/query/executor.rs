//! Query execution against an open store.
//!
//! Provides isolated query execution that can be tested independently
//! of the lesson and the command line.

use crate::db::{DatabaseClient, QueryResult, Row};
use crate::error::Result;
use tracing::{debug, warn};

/// Runs literal SQL statements against one open store connection.
///
/// The runner performs no validation, rewriting or retrying: the statement
/// goes to the store as written and store failures come back unchanged.
pub struct QueryRunner<'a> {
    db: &'a dyn DatabaseClient,
}

impl<'a> QueryRunner<'a> {
    /// Creates a new query runner over an open client.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self { db }
    }

    /// Executes one statement and returns the full labeled result.
    pub async fn run(&self, sql: &str) -> Result<QueryResult> {
        debug!("Executing: {}", sql.trim());

        match self.db.execute_query(sql).await {
            Ok(result) => {
                debug!(
                    "{} row(s), {} column(s) in {:?}",
                    result.row_count,
                    result.columns.len(),
                    result.execution_time
                );
                Ok(result)
            }
            Err(e) => {
                warn!("Query failed: {e}");
                Err(e)
            }
        }
    }

    /// Executes one statement and returns `(rows, column_labels)`.
    pub async fn run_labeled(&self, sql: &str) -> Result<(Vec<Row>, Vec<String>)> {
        Ok(self.run(sql).await?.into_parts())
    }
}
