//! Output writers for encoded records
//!
//! Records are written back-to-back with no framing: every BSON document
//! carries its own length prefix.

use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::config::OutputTarget;
use crate::error::{ExecutionError, Result};

/// Trait for writing encoded records to an output
#[async_trait]
pub trait RecordWriter: Send {
    /// Write one encoded record
    async fn write_record(&mut self, record: &[u8]) -> Result<()>;

    /// Flush buffered output
    async fn finalize(&mut self) -> Result<()>;

    /// Total number of bytes accepted so far
    fn bytes_written(&self) -> u64;
}

/// Buffered writer producing a concatenated BSON stream
pub struct BsonStreamWriter<W> {
    writer: BufWriter<W>,
    /// Name used in log and error messages
    label: String,
    records: u64,
    bytes: u64,
}

impl<W: AsyncWrite + Unpin + Send> BsonStreamWriter<W> {
    /// Wrap any async writer
    pub fn new(inner: W, label: impl Into<String>) -> Self {
        Self {
            writer: BufWriter::new(inner),
            label: label.into(),
            records: 0,
            bytes: 0,
        }
    }
}

impl BsonStreamWriter<tokio::io::Stdout> {
    /// Writer over the process's standard output
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout(), "<stdout>")
    }
}

impl BsonStreamWriter<File> {
    /// Create (or truncate) the file at `path`
    pub async fn create(path: &Path) -> Result<Self> {
        validate_path(path)?;
        let file = File::create(path).await.map_err(|e| {
            ExecutionError::OutputUnavailable(format!("{}: {}", path.display(), e))
        })?;

        debug!("Created BSON output file: {}", path.display());
        Ok(Self::new(file, path.display().to_string()))
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> RecordWriter for BsonStreamWriter<W> {
    async fn write_record(&mut self, record: &[u8]) -> Result<()> {
        self.writer.write_all(record).await.map_err(|e| {
            ExecutionError::WriteFailed(format!("{}: {}", self.label, e))
        })?;
        self.records += 1;
        self.bytes += record.len() as u64;
        Ok(())
    }

    async fn finalize(&mut self) -> Result<()> {
        self.writer.flush().await.map_err(|e| {
            ExecutionError::WriteFailed(format!("{}: {}", self.label, e))
        })?;

        debug!(
            "Finalized {} ({} records, {} bytes)",
            self.label, self.records, self.bytes
        );
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

/// Open the writer for a configured output target
pub async fn open_writer(target: &OutputTarget) -> Result<Box<dyn RecordWriter>> {
    match target {
        OutputTarget::Stdout => Ok(Box::new(BsonStreamWriter::stdout())),
        OutputTarget::File(path) => Ok(Box::new(BsonStreamWriter::create(path).await?)),
    }
}

/// Check that the parent directory of `path` exists
fn validate_path(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ExecutionError::OutputUnavailable(format!(
                "Directory does not exist: {}",
                parent.display()
            ))
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tokio::fs;

    #[tokio::test]
    async fn test_writes_are_concatenated() {
        let mut writer = BsonStreamWriter::new(Vec::new(), "memory");
        writer.write_record(&[5, 0, 0, 0, 0]).await.unwrap();
        writer.write_record(&[6, 0, 0, 0, 0]).await.unwrap();
        writer.finalize().await.unwrap();

        assert_eq!(writer.bytes_written(), 10);
        assert_eq!(
            writer.writer.get_ref(),
            &vec![5, 0, 0, 0, 0, 6, 0, 0, 0, 0]
        );
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let mock = tokio_test::io::Builder::new()
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
            .build();
        let mut writer = BsonStreamWriter::new(mock, "<stdout>");

        writer.write_record(&[5, 0, 0, 0, 0]).await.unwrap();
        let err = writer.finalize().await.unwrap_err();
        assert!(err.to_string().contains("reader went away"));
    }

    #[tokio::test]
    async fn test_file_output() {
        let path = std::env::temp_dir().join("cgmlst_export_writer_test.bson");
        let mut writer = open_writer(&OutputTarget::File(path.clone())).await.unwrap();
        writer.write_record(&[5, 0, 0, 0, 0]).await.unwrap();
        writer.finalize().await.unwrap();

        let content = fs::read(&path).await.unwrap();
        assert_eq!(content, vec![5, 0, 0, 0, 0]);

        fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let result = BsonStreamWriter::create(Path::new("/nonexistent/directory/out.bson")).await;
        assert!(result.is_err());
    }
}
