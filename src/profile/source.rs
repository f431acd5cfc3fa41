//! Validation of raw genome documents into typed source records.

use mongodb::bson::{Bson, Document};

use crate::error::RecordError;

/// A genome document that passed validation.
///
/// Scalar fields the export copies verbatim are kept as [`Bson`] so their
/// stored type survives the round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    /// String form of `_id`
    pub id: String,
    pub organism_id: Bson,
    pub file_id: Bson,
    pub public: Bson,
    /// `analysis.cgmlst.__v`, when stored
    pub version: Option<Bson>,
    /// `analysis.cgmlst.matches`, in stored order
    pub matches: Vec<AlleleMatch>,
}

/// One entry of `analysis.cgmlst.matches`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlleleMatch {
    pub gene: String,
    pub id: Bson,
}

impl SourceRecord {
    /// Validate a projected genome document.
    ///
    /// Field paths in errors are dotted, with array positions as segments
    /// (`analysis.cgmlst.matches.3.gene`).
    pub fn from_document(doc: &Document) -> Result<Self, RecordError> {
        let analysis = require_document(doc, "analysis", "analysis")?;
        let cgmlst = require_document(analysis, "cgmlst", "analysis.cgmlst")?;

        let id = record_id(doc).ok_or_else(|| RecordError::MissingField("_id".to_string()))?;
        let organism_id = require(doc, "organismId", "organismId")?.clone();
        let file_id = require(doc, "fileId", "fileId")?.clone();
        let public = require(doc, "public", "public")?.clone();
        let version = cgmlst.get("__v").cloned();

        let entries = match require(cgmlst, "matches", "analysis.cgmlst.matches")? {
            Bson::Array(entries) => entries,
            other => return Err(mismatch("analysis.cgmlst.matches", "array", other)),
        };

        let matches = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| AlleleMatch::from_bson(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id,
            organism_id,
            file_id,
            public,
            version,
            matches,
        })
    }
}

impl AlleleMatch {
    fn from_bson(index: usize, entry: &Bson) -> Result<Self, RecordError> {
        let path = format!("analysis.cgmlst.matches.{index}");
        let entry = match entry {
            Bson::Document(entry) => entry,
            other => return Err(mismatch(&path, "document", other)),
        };

        let gene_path = format!("{path}.gene");
        let gene = match require(entry, "gene", &gene_path)? {
            Bson::String(gene) => gene.clone(),
            other => return Err(mismatch(&gene_path, "string", other)),
        };
        let id = require(entry, "id", &format!("{path}.id"))?.clone();

        Ok(Self { gene, id })
    }
}

/// String form of a document's `_id`, if it has one.
///
/// ObjectIds render as 24-character hex, strings as themselves, numbers in
/// decimal, doubles always with a fractional part. Anything else falls
/// back to the BSON display form.
pub fn record_id(doc: &Document) -> Option<String> {
    doc.get("_id").map(id_to_string)
}

fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        Bson::Int32(n) => n.to_string(),
        Bson::Int64(n) => n.to_string(),
        Bson::Double(x) if x.is_finite() && x.fract() == 0.0 => format!("{x:.1}"),
        Bson::Double(x) => x.to_string(),
        other => other.to_string(),
    }
}

fn require<'a>(doc: &'a Document, key: &str, path: &str) -> Result<&'a Bson, RecordError> {
    doc.get(key)
        .ok_or_else(|| RecordError::MissingField(path.to_string()))
}

fn require_document<'a>(
    doc: &'a Document,
    key: &str,
    path: &str,
) -> Result<&'a Document, RecordError> {
    match require(doc, key, path)? {
        Bson::Document(inner) => Ok(inner),
        other => Err(mismatch(path, "document", other)),
    }
}

fn mismatch(path: &str, expected: &'static str, found: &Bson) -> RecordError {
    RecordError::TypeMismatch {
        field: path.to_string(),
        expected,
        found: format!("{:?}", found.element_type()),
    }
}
