//! Generic tabular persistence: create-if-absent, append, list newest-first.
//!
//! The store knows nothing about forms. It is parameterized by table name and column list, and it
//! owns the identifier column (`ID`) that every table starts with.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod sqlite;

pub use sqlite::{ColumnSchema, SqliteStore, TableSchema};

/// Auto-assigned, monotonically increasing identifier column present in every table.
pub const ID_COLUMN: &str = "ID";

/// Identifier assigned to a freshly inserted row.
pub type RecordId = i64;

/// Physical column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Real,
    Text,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

/// One non-identifier column of a table layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: String,
    pub col_type: ColumnType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            col_type,
        }
    }
}

/// A single stored cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

/// One persisted row. `values` is aligned with the owning [`RecordSet::columns`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub values: Vec<Value>,
}

/// The full contents of a table: physical column order plus rows, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSet {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(column))
    }

    /// Looks up a cell by record position and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.records.get(row)?.values.get(idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no such table: {0}")]
    TableNotFound(String),
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("{columns} column names given for {values} values")]
    ColumnValueMismatch { columns: usize, values: usize },
    #[error("unsupported value in column '{column}'")]
    UnsupportedValue { column: String },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Contract every table backend fulfils. Each call is a single atomic unit.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Creates `table` with `ID` followed by `columns` unless a table of that name already exists.
    /// An existing table is accepted as-is, even if its layout differs.
    async fn ensure_table(&self, table: &str, columns: &[ColumnSpec]) -> Result<(), StorageError>;

    /// Appends one row and returns its identifier.
    async fn insert(
        &self,
        table: &str,
        columns: &[String],
        values: &[Value],
    ) -> Result<RecordId, StorageError>;

    /// Returns every row ordered by identifier descending.
    async fn list_all(&self, table: &str) -> Result<RecordSet, StorageError>;
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn validate_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates and double-quotes an identifier for splicing into SQL.
pub(crate) fn quote_ident(ident: &str) -> Result<String, StorageError> {
    if !validate_ident(ident) {
        return Err(StorageError::InvalidIdentifier(ident.to_string()));
    }
    Ok(format!("\"{}\"", ident))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(validate_ident("EbtModules"));
        assert!(validate_ident("_x1"));
        assert!(!validate_ident(""));
        assert!(!validate_ident("1abc"));
        assert!(!validate_ident("Ebt Modules"));
        assert!(!validate_ident("x\"; DROP TABLE y; --"));
        assert_eq!(quote_ident("ID").unwrap(), "\"ID\"");
        assert!(matches!(
            quote_ident("a-b"),
            Err(StorageError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn record_set_lookup_is_case_insensitive() {
        let set = RecordSet {
            columns: vec!["ID".into(), "TrainerName".into()],
            records: vec![Record {
                id: 7,
                values: vec![Value::Integer(7), Value::from("J. Smith")],
            }],
        };
        assert_eq!(set.cell(0, "trainername"), Some(&Value::from("J. Smith")));
        assert_eq!(set.cell(1, "ID"), None);
        assert_eq!(
            serde_json::to_value(&set.records[0].values).unwrap(),
            serde_json::json!([7, "J. Smith"])
        );
    }
}
