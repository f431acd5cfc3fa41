//! Progress and failure reporting for export operations
//!
//! These lines form the human-readable side channel of the export and are
//! written verbatim, outside of `tracing`, so that their format stays fixed:
//!
//! ```text
//! Problem parsing <id>
//! Processed <n> sequences
//! Errors:
//! <id>
//! ```

use std::io::{self, Write};

/// Progress tracker for export operations
///
/// Counts processed documents and prints a line every `interval` of them.
pub struct ProgressTracker {
    /// Number of documents processed so far
    processed: u64,
    /// Print a progress line every this many documents
    interval: u64,
    /// Destination of the report lines
    out: Box<dyn Write + Send>,
}

impl ProgressTracker {
    /// Create a tracker reporting to stderr
    pub fn stderr(interval: u64) -> Self {
        Self::with_writer(interval, Box::new(io::stderr()))
    }

    /// Create a tracker reporting to an arbitrary writer
    ///
    /// An `interval` of zero is treated as one.
    pub fn with_writer(interval: u64, out: Box<dyn Write + Send>) -> Self {
        Self {
            processed: 0,
            interval: interval.max(1),
            out,
        }
    }

    /// Number of documents processed so far
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Count one more processed document
    ///
    /// Failed documents count too.
    pub fn document_processed(&mut self) -> io::Result<()> {
        self.processed += 1;
        if self.processed % self.interval == 0 {
            writeln!(self.out, "Processed {} sequences", self.processed)?;
        }
        Ok(())
    }

    /// Report a document that could not be exported
    pub fn problem(&mut self, id: &str) -> io::Result<()> {
        writeln!(self.out, "Problem parsing {id}")
    }

    /// Print the error summary
    pub fn finish(&mut self, errors: &[String]) -> io::Result<()> {
        writeln!(self.out, "Errors:\n{}", errors.join("\n"))?;
        self.out.flush()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Cloneable in-memory writer for inspecting report output
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_progress_lines_at_interval() {
        let buf = SharedBuffer::default();
        let mut tracker = ProgressTracker::with_writer(500, Box::new(buf.clone()));

        for _ in 0..1499 {
            tracker.document_processed().unwrap();
        }
        assert_eq!(tracker.processed(), 1499);
        assert_eq!(buf.contents(), "Processed 500 sequences\nProcessed 1000 sequences\n");

        tracker.document_processed().unwrap();
        assert!(buf.contents().ends_with("Processed 1500 sequences\n"));
    }

    #[test]
    fn test_problem_line() {
        let buf = SharedBuffer::default();
        let mut tracker = ProgressTracker::with_writer(500, Box::new(buf.clone()));
        tracker.problem("5a1f0c3e9b1d4c0012345678").unwrap();
        assert_eq!(buf.contents(), "Problem parsing 5a1f0c3e9b1d4c0012345678\n");
    }

    #[test]
    fn test_summary_with_errors() {
        let buf = SharedBuffer::default();
        let mut tracker = ProgressTracker::with_writer(500, Box::new(buf.clone()));
        tracker
            .finish(&["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(buf.contents(), "Errors:\na\nb\n");
    }

    #[test]
    fn test_summary_without_errors() {
        let buf = SharedBuffer::default();
        let mut tracker = ProgressTracker::with_writer(500, Box::new(buf.clone()));
        tracker.finish(&[]).unwrap();
        assert_eq!(buf.contents(), "Errors:\n\n");
    }
}
