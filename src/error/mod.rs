//! Error handling for the export run.
//!
//! Two tiers of errors exist:
//! - [`ExportError`]: fatal failures (configuration, connection, query,
//!   output writes) that abort the run
//! - [`RecordError`]: per-document failures that are reported and skipped
//!
//! MongoDB driver errors are rendered as structured JSON through
//! [`mongo::extract_error_info`].

pub mod kinds;
pub mod mongo;

// Re-export commonly used types
pub use kinds::{
    ConfigError, ConnectionError, ExecutionError, ExportError, RecordError, Result,
};
pub use mongo::ErrorInfo;
