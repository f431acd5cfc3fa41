use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured error information extracted from MongoDB errors.
///
/// Serialized to JSON when a driver error aborts the export, so the
/// diagnostic on stderr is machine-readable.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

impl ErrorInfo {
    /// Convert error info to compact JSON string (single line).
    pub fn to_json_compact(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Format MongoDB error messages as pretty JSON wrapped in an `error` field.
///
/// Used by the `Display` implementation of `ExportError::MongoDb`.
pub fn format_mongodb_error(
    f: &mut fmt::Formatter<'_>,
    error: &mongodb::error::Error,
) -> fmt::Result {
    let info = extract_error_info(error);
    let wrapper = serde_json::json!({ "error": info });
    let json_output = serde_json::to_string_pretty(&wrapper).map_err(|_| fmt::Error)?;
    write!(f, "\n{json_output}")
}

/// Extract structured information from a MongoDB error using the driver API.
///
/// Only read-path failures are expected here: server selection, auth,
/// command errors raised by `find`/`getMore`, and network I/O.
pub fn extract_error_info(error: &mongodb::error::Error) -> ErrorInfo {
    use mongodb::error::ErrorKind;

    let mut info = ErrorInfo::default();

    match error.kind.as_ref() {
        ErrorKind::Command(command_error) => {
            info.error_type = Some("mongo.command_error".to_string());
            info.code = Some(command_error.code);
            info.message = Some(command_error.message.clone());
            info.name = get_error_name(command_error.code);
        }
        ErrorKind::Authentication { message, .. } => {
            info.error_type = Some("mongo.authentication_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::InvalidArgument { message, .. } => {
            info.error_type = Some("mongo.invalid_argument".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::ServerSelection { message, .. } => {
            info.error_type = Some("mongo.server_selection_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::Io(io_error) => {
            info.error_type = Some("mongo.io_error".to_string());
            info.message = Some(io_error.to_string());
        }
        _ => {
            info.message = Some(error.to_string());
        }
    }

    info
}

/// Get a human-readable error name from a MongoDB error code.
fn get_error_name(code: i32) -> Option<String> {
    let name = match code {
        2 => "BadValue",
        13 => "Unauthorized",
        18 => "AuthenticationFailed",
        26 => "NamespaceNotFound",
        43 => "CursorNotFound",
        50 => "MaxTimeMSExpired",
        _ => return None,
    };

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_error_names() {
        assert_eq!(get_error_name(43).as_deref(), Some("CursorNotFound"));
        assert_eq!(get_error_name(13).as_deref(), Some("Unauthorized"));
        assert_eq!(get_error_name(99999), None);
    }

    #[test]
    fn test_error_info_skips_empty_fields() {
        let info = ErrorInfo {
            error_type: Some("mongo.command_error".to_string()),
            code: Some(26),
            name: get_error_name(26),
            message: None,
        };
        let json = info.to_json_compact().unwrap();
        assert_eq!(
            json,
            r#"{"type":"mongo.command_error","code":26,"name":"NamespaceNotFound"}"#
        );
    }
}
