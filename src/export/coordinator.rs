//! Export coordinator for orchestrating export operations
//!
//! Pulls genome documents from the streaming query, minifies each one and
//! writes it out. A document that fails validation or encoding is reported
//! and skipped; driver and output errors abort the run.

use std::time::Instant;

use mongodb::bson::Document;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::profile::{minify, record_id};

use super::progress::ProgressTracker;
use super::streaming::StreamingQuery;
use super::writer::RecordWriter;

/// Result of an export operation
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Documents pulled from the cursor
    pub processed: u64,
    /// Records written to the output
    pub exported: u64,
    /// Identifiers of documents that could not be exported, in cursor order
    pub errors: Vec<String>,
    /// Failed documents whose `_id` could not be read either
    pub unidentified: u64,
    /// Bytes written to the output
    pub bytes_written: u64,
    /// Time taken for export
    pub elapsed_ms: u64,
}

/// Coordinator for export operations
pub struct ExportCoordinator {
    /// Streaming query for fetching documents
    query: Box<dyn StreamingQuery>,
    /// Progress and failure reporting
    tracker: ProgressTracker,
    /// Writer for encoded records
    writer: Box<dyn RecordWriter>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(
        query: Box<dyn StreamingQuery>,
        tracker: ProgressTracker,
        writer: Box<dyn RecordWriter>,
    ) -> Self {
        Self {
            query,
            tracker,
            writer,
        }
    }

    /// Execute the export operation
    ///
    /// 1. Stream documents in batches
    /// 2. Minify and write each document, or report it
    /// 3. Report progress
    /// 4. Flush the output, close the cursor and print the error summary
    ///
    /// # Returns
    /// * `Result<ExportSummary>` - Export statistics or error
    pub async fn execute(&mut self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::default();

        info!("Starting export operation");

        while let Some(docs) = self.query.next_batch().await? {
            debug!("Received batch of {} documents", docs.len());

            for doc in &docs {
                self.export_document(doc, &mut summary).await?;
                self.tracker.document_processed()?;
                summary.processed += 1;
            }
        }

        debug!("Finalizing output");
        self.writer.finalize().await?;
        self.query.close().await?;

        self.tracker.finish(&summary.errors)?;

        summary.bytes_written = self.writer.bytes_written();
        summary.elapsed_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Export completed: {} of {} documents, {} failed, {} bytes, {} ms",
            summary.exported,
            summary.processed,
            summary.errors.len() as u64 + summary.unidentified,
            summary.bytes_written,
            summary.elapsed_ms
        );
        if summary.unidentified > 0 {
            warn!(
                "{} failed documents had no readable _id and are not listed",
                summary.unidentified
            );
        }

        Ok(summary)
    }

    async fn export_document(&mut self, doc: &Document, summary: &mut ExportSummary) -> Result<()> {
        match minify(doc) {
            Ok(bytes) => {
                self.writer.write_record(&bytes).await?;
                summary.exported += 1;
            }
            Err(reason) => match record_id(doc) {
                Some(id) => {
                    debug!("Skipping {}: {}", id, reason);
                    // The summary still lists the id if this line is lost.
                    if let Err(e) = self.tracker.problem(&id) {
                        warn!("Could not report failed document {}: {}", id, e);
                    }
                    summary.errors.push(id);
                }
                None => {
                    warn!("Skipping document without _id: {}", reason);
                    summary.unidentified += 1;
                }
            },
        }
        Ok(())
    }
}
