//! Schema compiler: turns every registered form into a create-if-absent table request.

use crate::domain::form::FormRegistry;
use crate::storage::table::{StorageError, TableStore};
use thiserror::Error;

/// A table for a declared form could not be created. The process must not start serving.
#[derive(Debug, Error)]
#[error("failed to ensure table '{table}' for form '{form}': {source}")]
pub struct CompileError {
    pub form: String,
    pub table: String,
    #[source]
    pub source: StorageError,
}

/// Ensures one table per form. Safe to run on every start against the same database:
/// existing tables are left untouched.
pub async fn compile(registry: &FormRegistry, store: &dyn TableStore) -> Result<(), CompileError> {
    for form in registry.forms() {
        let columns = form.column_specs();
        store
            .ensure_table(form.table_name(), &columns)
            .await
            .map_err(|source| CompileError {
                form: form.name().to_string(),
                table: form.table_name().to_string(),
                source,
            })?;
    }
    tracing::info!(tables = registry.len(), "schema compiled, tables are ready");
    Ok(())
}
