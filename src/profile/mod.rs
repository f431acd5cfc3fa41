//! cgMLST profile model
//!
//! A genome document from the source collection goes through two steps:
//!
//! 1. [`SourceRecord::from_document`] validates the projected fields and
//!    reports the first problem as a typed [`RecordError`]
//! 2. [`ExportRecord::from`] collapses the allele matches into a
//!    `gene -> id` document and defaults the version
//!
//! [`minify`] chains both and encodes the result.

pub mod record;
pub mod source;

pub use record::{ExportRecord, decode_stream};
pub use source::{AlleleMatch, SourceRecord, record_id};

use mongodb::bson::Document;

use crate::error::RecordError;

/// Validate, transform and encode one genome document.
pub fn minify(doc: &Document) -> Result<Vec<u8>, RecordError> {
    let source = SourceRecord::from_document(doc)?;
    ExportRecord::from(source).encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{Bson, doc};

    #[test]
    fn test_minify_genome() {
        let genome = doc! {
            "_id": "g-17",
            "public": false,
            "fileId": "abc123",
            "organismId": "485",
            "analysis": {
                "cgmlst": {
                    "matches": [
                        { "gene": "NEIS0001", "id": 4 },
                        { "gene": "NEIS0002", "id": 9 },
                        { "gene": "NEIS0001", "id": 11 },
                    ],
                },
            },
        };

        let bytes = minify(&genome).unwrap();
        let records = decode_stream(&bytes).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.id, "g-17");
        assert_eq!(record.file_id, Bson::String("abc123".to_string()));
        assert_eq!(record.version, Bson::Int32(0));
        assert_eq!(record.matches, doc! { "NEIS0001": 11, "NEIS0002": 9 });
    }

    #[test]
    fn test_minify_reports_missing_cgmlst() {
        let genome = doc! { "_id": "g-18", "analysis": {} };
        assert_eq!(
            minify(&genome),
            Err(RecordError::MissingField("analysis.cgmlst".to_string()))
        );
    }
}
