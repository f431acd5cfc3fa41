use std::{fmt, io};

use crate::error::mongo::format_mongodb_error;

/// Crate-wide `Result` type using [`ExportError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Top-level error type for the export run.
///
/// Every variant is fatal: it aborts the run and is reported by `main`.
/// Per-document failures use [`RecordError`] instead and never reach here.
#[derive(Debug)]
pub enum ExportError {
    /// Connection-related errors.
    Connection(ConnectionError),

    /// Configuration errors.
    Config(ConfigError),

    /// Errors raised while driving the export pipeline.
    Execution(ExecutionError),

    /// I/O errors.
    Io(io::Error),

    /// MongoDB driver errors.
    MongoDb(mongodb::error::Error),
}

/// Connection-specific errors.
#[derive(Debug)]
pub enum ConnectionError {
    /// Failed to establish a connection.
    ConnectionFailed(String),

    /// Invalid connection URI.
    InvalidUri(String),

    /// Not currently connected to MongoDB.
    NotConnected,
}

/// Export pipeline errors.
#[derive(Debug)]
pub enum ExecutionError {
    /// The output target could not be opened.
    OutputUnavailable(String),

    /// Writing an encoded record to the output failed.
    WriteFailed(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Why a single source document could not be exported.
///
/// These are recoverable: the document is skipped and its identifier is
/// added to the error summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A required field is absent. Holds the dotted path of the field.
    MissingField(String),

    /// A field is present but has the wrong BSON type.
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// The export record could not be serialized to BSON.
    EncodeFailure(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Connection(e) => write!(f, "Connection error: {e}"),
            ExportError::Config(e) => write!(f, "Configuration error: {e}"),
            ExportError::Execution(e) => write!(f, "Export error: {e}"),
            ExportError::Io(e) => write!(f, "I/O error: {e}"),
            ExportError::MongoDb(e) => format_mongodb_error(f, e),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ConnectionError::InvalidUri(uri) => write!(f, "Invalid connection URI: {uri}"),
            ConnectionError::NotConnected => write!(f, "Not connected to MongoDB"),
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::OutputUnavailable(msg) => write!(f, "Cannot open output: {msg}"),
            ExecutionError::WriteFailed(msg) => write!(f, "Write failed: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::MissingField(field) => write!(f, "missing field '{field}'"),
            RecordError::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "field '{field}' should be {expected}, found {found}"),
            RecordError::EncodeFailure(msg) => write!(f, "cannot encode record: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::MongoDb(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for ConnectionError {}
impl std::error::Error for ExecutionError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for RecordError {}

/* ========================= Conversions to ExportError ========================= */

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<mongodb::error::Error> for ExportError {
    fn from(err: mongodb::error::Error) -> Self {
        ExportError::MongoDb(err)
    }
}

impl From<ConnectionError> for ExportError {
    fn from(err: ConnectionError) -> Self {
        ExportError::Connection(err)
    }
}

impl From<ExecutionError> for ExportError {
    fn from(err: ExecutionError) -> Self {
        ExportError::Execution(err)
    }
}

impl From<ConfigError> for ExportError {
    fn from(err: ConfigError) -> Self {
        ExportError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_display() {
        let missing = RecordError::MissingField("analysis.cgmlst.matches".to_string());
        assert_eq!(
            missing.to_string(),
            "missing field 'analysis.cgmlst.matches'"
        );

        let mismatch = RecordError::TypeMismatch {
            field: "analysis.cgmlst.matches.0.gene".to_string(),
            expected: "string",
            found: "int32".to_string(),
        };
        assert_eq!(
            mismatch.to_string(),
            "field 'analysis.cgmlst.matches.0.gene' should be string, found int32"
        );
    }

    #[test]
    fn test_config_error_wraps_into_export_error() {
        let err: ExportError = ConfigError::InvalidValue {
            field: "export.batch_size".to_string(),
            value: "0".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value '0' for field 'export.batch_size'"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error;

        let err: ExportError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("I/O error"));
    }
}
