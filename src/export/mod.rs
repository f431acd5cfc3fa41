//! Streaming export of cgMLST profiles
//!
//! The export is built from three components:
//!
//! 1. **StreamingQuery**: pulls genome documents from the cursor in batches
//! 2. **ProgressTracker**: prints progress, per-document failures and the
//!    final error summary to stderr
//! 3. **RecordWriter**: writes encoded records back-to-back to the output
//!
//! These are orchestrated by the **ExportCoordinator**. [`run_export`] wires
//! them together from a [`Config`].

pub mod coordinator;
pub mod progress;
pub mod streaming;
pub mod writer;

pub use coordinator::{ExportCoordinator, ExportSummary};
pub use progress::ProgressTracker;
pub use streaming::{CursorStreamingQuery, StreamingQuery};
pub use writer::{BsonStreamWriter, RecordWriter, open_writer};

use tracing::info;

use crate::config::Config;
use crate::connection::ConnectionManager;
use crate::error::Result;

/// Run one complete export pass
///
/// Connects, queries, streams every matching genome to the configured
/// output and prints the error summary. Any error returned here is fatal.
pub async fn run_export(config: &Config) -> Result<ExportSummary> {
    let export = &config.export;

    let mut connection = ConnectionManager::new(config.connection.clone());
    connection.connect(&export.database).await?;
    let collection = connection.get_collection(&export.database, &export.collection)?;

    let query = CursorStreamingQuery::find_profiles(&collection, export.batch_size).await?;
    let writer = open_writer(&export.output_target()).await?;
    let tracker = ProgressTracker::stderr(export.progress_interval);

    info!(
        "Exporting cgMLST profiles from {}.{}",
        export.database, export.collection
    );

    let mut coordinator = ExportCoordinator::new(Box::new(query), tracker, writer);
    coordinator.execute().await
}
