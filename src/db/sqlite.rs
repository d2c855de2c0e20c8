//! SQLite database client implementation.
//!
//! Provides the `SqliteClient` struct that implements the `DatabaseClient`
//! trait for SQLite stores using sqlx. Every store it serves is opened with
//! `SQLITE_OPEN_READONLY`; seeded stores are written to a private scratch file
//! first and only then reopened read-only.

use crate::config::StoreConfig;
use crate::db::{
    Column, ColumnInfo, DatabaseClient, ForeignKey, QueryResult, Row, Schema, Table, Value,
};
use crate::error::{JoinsError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{
    Column as SqlxColumn, Either, Executor, Row as SqlxRow, Statement, TypeInfo, ValueRef,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info};

/// How long to wait for the single connection.
const ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Label used for stores built from a seed script.
const SEEDED_LABEL: &str = "(seeded)";

/// File name of the seeded store inside its scratch directory.
const SEED_FILE_NAME: &str = "seeded.sqlite";

/// SQLite database client.
///
/// Holds exactly one connection; the pool is only the handle sqlx offers
/// for shared `&self` access.
#[derive(Debug)]
pub struct SqliteClient {
    pool: SqlitePool,
    location: String,
    /// Scratch directory of a seeded store, removed when the client drops.
    scratch: Option<TempDir>,
}

impl SqliteClient {
    /// Opens an existing SQLite file read-only.
    ///
    /// A missing or unreadable file is reported by the engine as a store error.
    pub async fn open(path: &Path) -> Result<Self> {
        debug!("Opening store {} read-only", path.display());

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let pool = single_connection().connect_with(options).await?;

        info!("Opened store {}", path.display());
        Ok(Self {
            pool,
            location: path.display().to_string(),
            scratch: None,
        })
    }

    /// Builds a private store from a seed script and opens it read-only.
    ///
    /// The seed runs on a short-lived writer against a scratch file; the
    /// returned client only ever holds a read-only connection to it.
    pub async fn open_seeded(seed_sql: &str) -> Result<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("crm-joins-")
            .tempdir()
            .map_err(|e| JoinsError::io(format!("Failed to create scratch directory: {e}")))?;
        let path = scratch.path().join(SEED_FILE_NAME);

        let writer = single_connection()
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(&path)
                    .create_if_missing(true),
            )
            .await?;
        let seeded = sqlx::raw_sql(seed_sql).execute(&writer).await;
        writer.close().await;
        seeded?;
        debug!("Seeded scratch store {}", path.display());

        let mut client = Self::open(&path).await?;
        client.location = SEEDED_LABEL.to_string();
        client.scratch = Some(scratch);
        Ok(client)
    }

    /// Opens the store a `StoreConfig` points at.
    pub async fn open_config(config: &StoreConfig) -> Result<Self> {
        let path: &PathBuf = config
            .path
            .as_ref()
            .ok_or_else(|| JoinsError::config("Database path is required"))?;
        Self::open(path).await
    }

    /// Returns the file path, or `(seeded)` for seeded stores.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Fetches user table names, skipping SQLite's internal tables.
    async fn fetch_table_names(&self) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    /// Fetches columns and primary key for a specific table.
    async fn fetch_table(&self, table_name: &str) -> Result<Table> {
        let rows: Vec<(String, String, i64, Option<String>, i64)> = sqlx::query_as(
            r#"
            SELECT name, type, "notnull", dflt_value, pk
            FROM pragma_table_info(?1)
            ORDER BY cid
            "#,
        )
        .bind(table_name)
        .fetch_all(&self.pool)
        .await?;

        let mut pk_columns: Vec<(i64, String)> = rows
            .iter()
            .filter(|(_, _, _, _, pk)| *pk > 0)
            .map(|(name, _, _, _, pk)| (*pk, name.clone()))
            .collect();
        pk_columns.sort();

        let columns = rows
            .into_iter()
            .map(|(name, data_type, not_null, default, _)| Column {
                name,
                data_type,
                is_nullable: not_null == 0,
                default,
            })
            .collect();

        Ok(Table {
            name: table_name.to_string(),
            columns,
            primary_key: pk_columns.into_iter().map(|(_, name)| name).collect(),
        })
    }

    /// Fetches the foreign keys declared on a table.
    ///
    /// A constraint without target columns refers to the target's primary
    /// key; those are resolved against the already introspected tables.
    async fn fetch_foreign_keys(
        &self,
        table_name: &str,
        tables: &[Table],
    ) -> Result<Vec<ForeignKey>> {
        let rows: Vec<(i64, String, String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT id, "table", "from", "to"
            FROM pragma_foreign_key_list(?1)
            ORDER BY id, seq
            "#,
        )
        .bind(table_name)
        .fetch_all(&self.pool)
        .await?;

        let mut foreign_keys: Vec<(i64, ForeignKey)> = Vec::new();

        for (id, to_table, from_column, to_column) in rows {
            let position = foreign_keys.iter().position(|(fk_id, _)| *fk_id == id);
            let entry = match position {
                Some(i) => &mut foreign_keys[i].1,
                None => {
                    foreign_keys.push((
                        id,
                        ForeignKey::new(table_name, Vec::new(), to_table, Vec::new()),
                    ));
                    let last = foreign_keys.len() - 1;
                    &mut foreign_keys[last].1
                }
            };

            let index = entry.from_columns.len();
            entry.from_columns.push(from_column);

            let to_column = to_column.unwrap_or_else(|| {
                tables
                    .iter()
                    .find(|t| t.name == entry.to_table)
                    .and_then(|t| t.primary_key.get(index).cloned())
                    .unwrap_or_default()
            });
            entry.to_columns.push(to_column);
        }

        Ok(foreign_keys.into_iter().map(|(_, fk)| fk).collect())
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        let mut tables = Vec::new();
        for name in self.fetch_table_names().await? {
            tables.push(self.fetch_table(&name).await?);
        }

        let mut foreign_keys = Vec::new();
        for table in &tables {
            foreign_keys.extend(self.fetch_foreign_keys(&table.name, &tables).await?);
        }

        Ok(Schema {
            tables,
            foreign_keys,
        })
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        // Labels come from the prepared statement so empty results keep them.
        let statement = self.pool.prepare(sql).await?;
        let columns: Vec<ColumnInfo> = statement
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect();

        // The string must hold exactly one statement: anything the store
        // reports after the first statement completes is rejected.
        let mut rows: Vec<Row> = Vec::new();
        let mut completed = false;
        let mut stream = self.pool.fetch_many(sql);
        while let Some(item) = stream.next().await {
            let item = item?;
            if completed {
                return Err(sqlx::Error::InvalidArgument(
                    "expected a single SQL statement, found several".to_string(),
                )
                .into());
            }
            match item {
                Either::Left(_) => completed = true,
                Either::Right(row) => rows.push(convert_row(&row)?),
            }
        }

        let execution_time = start.elapsed();
        let row_count = rows.len();

        Ok(QueryResult {
            columns,
            rows,
            execution_time,
            row_count,
        })
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        info!("Closed store {}", self.location);
        Ok(())
    }
}

/// Pool options for a single, exclusively owned connection.
fn single_connection() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Result<Row> {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single column value using its runtime storage class.
///
/// SQLite columns are dynamically typed, so the declared column type says
/// little about what a given cell holds. Only a cell the store reports as
/// NULL becomes `Value::Null`; decode failures are errors.
fn convert_value(row: &SqliteRow, index: usize) -> Result<Value> {
    let storage_class = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_uppercase()
    };

    let value = match storage_class.as_str() {
        "INTEGER" | "BOOLEAN" => Value::Int(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" => Value::Float(row.try_get_unchecked::<f64, _>(index)?),
        "BLOB" => Value::Bytes(row.try_get_unchecked::<Vec<u8>, _>(index)?),

        // TEXT is read as raw bytes; anything that is not UTF-8 stays bytes
        _ => match String::from_utf8(row.try_get_unchecked::<Vec<u8>, _>(index)?) {
            Ok(text) => Value::String(text),
            Err(e) => Value::Bytes(e.into_bytes()),
        },
    };

    Ok(value)
}
