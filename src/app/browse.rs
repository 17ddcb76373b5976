//! Browse handler: fetch a whole table and shape it into a generic grid.

use crate::app::submission::Severity;
use crate::storage::table::{RecordSet, TableStore};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

pub const SELECT_TABLE_MESSAGE: &str = "Please select a form type to see the data.";
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseGrid {
    pub table: String,
    /// Physical column order, identifier first.
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, JsonValue>>,
    pub page_size: usize,
    pub sortable: bool,
    pub filterable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BrowseResult {
    Placeholder { message: String, severity: Severity },
    Grid(BrowseGrid),
    Error { table: String, message: String, severity: Severity },
}

impl BrowseResult {
    pub fn grid(&self) -> Option<&BrowseGrid> {
        match self {
            BrowseResult::Grid(g) => Some(g),
            _ => None,
        }
    }
}

/// Stateless; every call re-reads the table in full.
#[derive(Clone)]
pub struct BrowseHandler {
    store: Arc<dyn TableStore>,
}

impl BrowseHandler {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    pub async fn browse(&self, table: Option<&str>) -> BrowseResult {
        let Some(table) = table.map(str::trim).filter(|t| !t.is_empty()) else {
            return BrowseResult::Placeholder {
                message: SELECT_TABLE_MESSAGE.to_string(),
                severity: Severity::Info,
            };
        };

        match self.store.list_all(table).await {
            Ok(set) => BrowseResult::Grid(to_grid(table, set)),
            Err(e) => {
                tracing::error!(table, error = %e, "failed to load table");
                BrowseResult::Error {
                    table: table.to_string(),
                    message: format!("Error loading data for table '{}': {}", table, e),
                    severity: Severity::Danger,
                }
            }
        }
    }
}

fn to_grid(table: &str, set: RecordSet) -> BrowseGrid {
    let rows = set
        .records
        .into_iter()
        .map(|record| {
            set.columns
                .iter()
                .cloned()
                .zip(record.values.into_iter().map(|v| {
                    serde_json::to_value(v).unwrap_or(JsonValue::Null)
                }))
                .collect::<Map<String, JsonValue>>()
        })
        .collect();

    BrowseGrid {
        table: table.to_string(),
        columns: set.columns,
        rows,
        page_size: PAGE_SIZE,
        sortable: true,
        filterable: true,
    }
}
