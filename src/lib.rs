//! cgMLST profile exporter
//!
//! Reads genome documents carrying a cgMLST analysis from MongoDB and writes
//! a minified BSON record per genome to an output stream.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `connection`: MongoDB connection management
//! - `error`: Error types and handling
//! - `export`: Cursor streaming, output writing and progress reporting
//! - `profile`: Validation and minification of cgMLST profiles
//!
//! # Example
//!
//! ```no_run
//! use cgmlst_export::{Config, export::run_export};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.connection.uri = "mongodb://localhost:27017".to_string();
//!
//!     let summary = run_export(&config).await?;
//!     eprintln!("{} profiles exported", summary.exported);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod export;
pub mod profile;

// Re-export commonly used types
pub use config::Config;
pub use connection::ConnectionManager;
pub use error::{ExportError, RecordError, Result};
pub use export::{ExportCoordinator, ExportSummary};
pub use profile::{ExportRecord, SourceRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
