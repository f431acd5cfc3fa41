//! The minified profile written to the output stream.

use std::io::Cursor;

use mongodb::bson::{self, Bson, Document};
use serde::{Deserialize, Serialize};

use super::source::SourceRecord;
use crate::error::RecordError;

/// Minified cgMLST profile.
///
/// Serialized field order is `_id, organismId, fileId, public, version,
/// matches`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "organismId")]
    pub organism_id: Bson,
    #[serde(rename = "fileId")]
    pub file_id: Bson,
    pub public: Bson,
    pub version: Bson,
    /// Gene name to allele id
    pub matches: Document,
}

impl From<SourceRecord> for ExportRecord {
    fn from(source: SourceRecord) -> Self {
        // Re-inserting a gene replaces its allele but keeps its first position.
        let mut matches = Document::new();
        for m in source.matches {
            matches.insert(m.gene, m.id);
        }

        Self {
            id: source.id,
            organism_id: source.organism_id,
            file_id: source.file_id,
            public: source.public,
            version: source.version.unwrap_or(Bson::Int32(0)),
            matches,
        }
    }
}

impl ExportRecord {
    /// Encode as a single BSON document.
    pub fn encode(&self) -> Result<Vec<u8>, RecordError> {
        let doc =
            bson::to_document(self).map_err(|e| RecordError::EncodeFailure(e.to_string()))?;
        let mut buf = Vec::new();
        doc.to_writer(&mut buf)
            .map_err(|e| RecordError::EncodeFailure(e.to_string()))?;
        Ok(buf)
    }
}

/// Decode a stream of back-to-back BSON documents into export records.
pub fn decode_stream(bytes: &[u8]) -> bson::de::Result<Vec<ExportRecord>> {
    let mut cursor = Cursor::new(bytes);
    let mut records = Vec::new();
    while (cursor.position() as usize) < bytes.len() {
        let doc = Document::from_reader(&mut cursor)?;
        records.push(bson::from_document(doc)?);
    }
    Ok(records)
}
