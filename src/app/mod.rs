pub mod browse;
pub mod schema_compiler;
pub mod submission;

pub use browse::{BrowseGrid, BrowseHandler, BrowseResult};
pub use schema_compiler::{compile, CompileError};
pub use submission::{
    RawSubmission, Severity, SubmissionHandler, SubmissionOutcome, SubmissionResult,
};
