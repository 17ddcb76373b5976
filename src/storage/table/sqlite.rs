//! SQLite-backed [`TableStore`].

use crate::storage::table::{
    quote_ident, ColumnSpec, Record, RecordId, RecordSet, StorageError, TableStore, Value,
    ID_COLUMN,
};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Physical layout of one table as reported by the SQLite catalog.
#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    pub table_name: String,
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    /// Declared type (e.g. `INTEGER`, `REAL`, `TEXT`).
    pub data_type: String,
    pub is_nullable: bool,
    pub primary_key: bool,
}

/// Table store over a SQLite connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects to `database_url` (e.g. `sqlite://pilot_training_portal.db`), creating the file
    /// if it is missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?;
        // Every connection to `:memory:` is its own database.
        let max_connections = if database_url.contains(":memory:") || database_url.contains("mode=memory") {
            1
        } else {
            max_connections.max(1)
        };
        Self::connect_with(options, max_connections).await
    }

    /// Opens (or creates) the database file at `path`.
    pub async fn open(path: &Path, max_connections: u32) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new().filename(path);
        Self::connect_with(options, max_connections.max(1)).await
    }

    async fn connect_with(
        options: SqliteConnectOptions,
        max_connections: u32,
    ) -> Result<Self, StorageError> {
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS));
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        tracing::info!(max_connections, "opened sqlite store");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trips a trivial statement.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn count_rows(&self, table: &str) -> Result<i64, StorageError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table)?);
        sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, table))
    }

    /// Lists user tables and their columns, ordered by table name.
    pub async fn describe_tables(&self) -> Result<Vec<TableSchema>, StorageError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tables = Vec::with_capacity(names.len());
        for table_name in names {
            let rows = sqlx::query(
                "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid",
            )
            .bind(&table_name)
            .fetch_all(&self.pool)
            .await?;

            let mut columns = Vec::with_capacity(rows.len());
            for r in rows {
                let notnull: i64 = r.try_get("notnull")?;
                let pk: i64 = r.try_get("pk")?;
                columns.push(ColumnSchema {
                    name: r.try_get("name")?,
                    data_type: r.try_get("type")?,
                    is_nullable: notnull == 0 && pk == 0,
                    primary_key: pk > 0,
                });
            }
            tables.push(TableSchema {
                table_name,
                columns,
            });
        }
        Ok(tables)
    }
}

#[async_trait]
impl TableStore for SqliteStore {
    async fn ensure_table(&self, table: &str, columns: &[ColumnSpec]) -> Result<(), StorageError> {
        let mut cols_sql = vec![format!(
            "{} INTEGER PRIMARY KEY AUTOINCREMENT",
            quote_ident(ID_COLUMN)?
        )];
        for c in columns {
            cols_sql.push(format!("{} {}", quote_ident(&c.name)?, c.col_type.as_sql()));
        }
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({}) STRICT",
            quote_ident(table)?,
            cols_sql.join(", ")
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        tracing::debug!(table, columns = columns.len(), "ensured table");
        Ok(())
    }

    async fn insert(
        &self,
        table: &str,
        columns: &[String],
        values: &[Value],
    ) -> Result<RecordId, StorageError> {
        if columns.len() != values.len() {
            return Err(StorageError::ColumnValueMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }
        let table_sql = quote_ident(table)?;
        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", table_sql)
        } else {
            let quoted = columns
                .iter()
                .map(|c| quote_ident(c))
                .collect::<Result<Vec<_>, _>>()?;
            let placeholders = vec!["?"; columns.len()].join(", ");
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table_sql,
                quoted.join(", "),
                placeholders
            )
        };

        let mut query = sqlx::query(&sql);
        for value in values {
            query = match value {
                Value::Null => query.bind(Option::<String>::None),
                Value::Integer(i) => query.bind(*i),
                Value::Real(f) => query.bind(*f),
                Value::Text(s) => query.bind(s.clone()),
            };
        }
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, table))?;
        Ok(result.last_insert_rowid())
    }

    async fn list_all(&self, table: &str) -> Result<RecordSet, StorageError> {
        let table_sql = quote_ident(table)?;
        let mut tx = self.pool.begin().await?;

        let columns: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
                .bind(table)
                .fetch_all(&mut *tx)
                .await?;
        if columns.is_empty() {
            return Err(StorageError::TableNotFound(table.to_string()));
        }

        let sql = format!(
            "SELECT * FROM {} ORDER BY {} DESC",
            table_sql,
            quote_ident(ID_COLUMN)?
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| classify(e, table))?;
        tx.commit().await?;

        let id_idx = columns.iter().position(|c| c.eq_ignore_ascii_case(ID_COLUMN));
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut values = Vec::with_capacity(columns.len());
            for (idx, column) in columns.iter().enumerate() {
                values.push(decode_cell(row, idx, column)?);
            }
            let id = id_idx
                .and_then(|i| match values.get(i) {
                    Some(Value::Integer(id)) => Some(*id),
                    _ => None,
                })
                .unwrap_or_default();
            records.push(Record { id, values });
        }
        Ok(RecordSet { columns, records })
    }
}

/// Decodes a cell by its dynamic storage class (NULL, INTEGER, REAL, TEXT).
fn decode_cell(row: &SqliteRow, idx: usize, column: &str) -> Result<Value, StorageError> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return Ok(v.map(Value::Integer).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<f64, _>(idx) {
        return Ok(Value::Real(v));
    }
    if let Ok(v) = row.try_get::<String, _>(idx) {
        return Ok(Value::Text(v));
    }
    Err(StorageError::UnsupportedValue {
        column: column.to_string(),
    })
}

fn classify(err: sqlx::Error, table: &str) -> StorageError {
    if let sqlx::Error::Database(db) = &err {
        if db.message().starts_with("no such table") {
            return StorageError::TableNotFound(table.to_string());
        }
    }
    StorageError::Database(err)
}
