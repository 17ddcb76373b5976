pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{
    compile, BrowseHandler, BrowseResult, CompileError, RawSubmission, Severity,
    SubmissionHandler, SubmissionOutcome, SubmissionResult,
};
pub use domain::form::{
    ConfigurationError, FieldKind, FieldSpec, FormConfig, FormDefinition, FormRegistry,
};
pub use infra::config::AppConfig;
pub use storage::table::{
    ColumnSpec, ColumnType, Record, RecordSet, SqliteStore, StorageError, TableStore, Value,
};
