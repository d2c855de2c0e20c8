//! Mock database clients for testing.
//!
//! Provide canned results and canned failures for the layers that sit on top
//! of a store (runner, lesson, rendering) without opening SQLite.

use super::{ColumnInfo, DatabaseClient, QueryResult, Schema, Value};
use crate::error::{JoinsError, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// A mock database client that returns predefined results.
///
/// Every query is recorded so tests can assert on what was submitted.
pub struct MockDatabaseClient {
    result: Option<QueryResult>,
    executed: Mutex<Vec<String>>,
}

impl MockDatabaseClient {
    /// Creates a mock that echoes each query back as its result.
    pub fn new() -> Self {
        Self {
            result: None,
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock that answers every query with the given result.
    pub fn with_result(result: QueryResult) -> Self {
        Self {
            result: Some(result),
            ..Self::new()
        }
    }

    /// Returns the SQL submitted so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|sql| sql.clone())
            .unwrap_or_default()
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        Ok(Schema::default())
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.to_string());
        }

        if let Some(result) = &self.result {
            return Ok(result.clone());
        }

        // Echo the SQL back as a one-row, one-column result
        let columns = vec![ColumnInfo::new("result", "TEXT")];
        let rows = vec![vec![Value::String(format!("Mock result for: {}", sql))]];

        Ok(QueryResult::with_data(columns, rows).with_execution_time(Duration::from_millis(1)))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client whose every operation fails as a closed store would.
#[derive(Debug, Default)]
pub struct FailingDatabaseClient;

impl FailingDatabaseClient {
    /// Creates a new failing client.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        Err(JoinsError::Store(sqlx::Error::PoolClosed))
    }

    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(JoinsError::Store(sqlx::Error::PoolClosed))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
