//! Streaming query abstractions for export operations
//!
//! Documents are pulled from the cursor in batches so the whole result set
//! is never held in memory. A query is single-pass: once exhausted or
//! closed it keeps returning `None`.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::{Collection, Cursor};
use tracing::{debug, info};

use crate::error::Result;

/// Trait for streaming query results in batches
#[async_trait]
pub trait StreamingQuery: Send {
    /// Fetch the next batch of documents
    ///
    /// # Returns
    /// * `Result<Option<Vec<Document>>>` - Next batch of documents, or None if exhausted
    async fn next_batch(&mut self) -> Result<Option<Vec<Document>>>;

    /// Close the query and cleanup resources
    async fn close(&mut self) -> Result<()>;
}

/// Filter selecting genomes that carry a cgMLST analysis.
pub fn profile_filter() -> Document {
    doc! { "analysis.cgmlst": { "$exists": true } }
}

/// Fields the export reads from each genome.
pub fn profile_projection() -> Document {
    doc! {
        "_id": 1,
        "public": 1,
        "fileId": 1,
        "analysis.cgmlst": 1,
        "organismId": 1,
    }
}

/// Cursor-backed streaming query
pub struct CursorStreamingQuery {
    cursor: Option<Cursor<Document>>,
    batch_size: u32,
    total_fetched: u64,
    closed: bool,
}

impl CursorStreamingQuery {
    /// Wrap an open cursor
    ///
    /// # Arguments
    /// * `cursor` - MongoDB cursor from a find operation
    /// * `batch_size` - Number of documents to fetch per batch
    pub fn new(cursor: Cursor<Document>, batch_size: u32) -> Self {
        Self {
            cursor: Some(cursor),
            batch_size,
            total_fetched: 0,
            closed: false,
        }
    }

    /// Issue the cgMLST profile query against `collection`
    ///
    /// No sort is requested, so documents arrive in whatever order the
    /// server returns them.
    pub async fn find_profiles(collection: &Collection<Document>, batch_size: u32) -> Result<Self> {
        debug!(
            "Querying {}.{} for cgMLST profiles",
            collection.namespace().db,
            collection.name()
        );
        let cursor = collection
            .find(profile_filter())
            .projection(profile_projection())
            .batch_size(batch_size)
            .await?;
        Ok(Self::new(cursor, batch_size))
    }
}

#[async_trait]
impl StreamingQuery for CursorStreamingQuery {
    async fn next_batch(&mut self) -> Result<Option<Vec<Document>>> {
        if self.closed {
            return Ok(None);
        }

        let cursor = match self.cursor.as_mut() {
            Some(c) => c,
            None => return Ok(None),
        };

        let mut batch = Vec::with_capacity(self.batch_size as usize);

        for _ in 0..self.batch_size {
            match cursor.try_next().await {
                Ok(Some(doc)) => batch.push(doc),
                Ok(None) => break,
                Err(e) => {
                    // Release the server-side cursor before bailing out
                    self.cursor = None;
                    self.closed = true;
                    return Err(e.into());
                }
            }
        }

        if batch.is_empty() {
            debug!("Profile cursor exhausted after {} documents", self.total_fetched);
            self.cursor = None;
            self.closed = true;
            Ok(None)
        } else {
            self.total_fetched += batch.len() as u64;
            debug!(
                "Fetched batch of {} documents (total: {})",
                batch.len(),
                self.total_fetched
            );
            Ok(Some(batch))
        }
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.cursor = None;
            self.closed = true;
            info!(
                "Closed profile cursor after fetching {} documents",
                self.total_fetched
            );
        }
        Ok(())
    }
}
