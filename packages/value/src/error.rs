//! Error types for value access and collection operations.
//!
//! A missing path segment is never an error here: lookups resolve to the
//! caller's default. Everything below is fatal and returned to the caller.

/// Errors raised while reading, writing or transforming values.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A value does not have the shape an operation requires.
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },

    /// A dynamic operation name that is not on the allow-list.
    #[error("Property [{name}] does not exist on this collection instance.")]
    UnknownOperation { name: String },

    /// An object does not respond to the requested method.
    #[error("method {class}::{method} does not exist")]
    UnknownMethod { class: String, method: String },

    /// The path argument is not usable for the operation.
    #[error("invalid path: {message}")]
    InvalidPath { message: String },

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Error::TypeMismatch {
            message: message.into(),
        }
    }

    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Error::UnknownOperation { name: name.into() }
    }

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Error::InvalidPath {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn type_mismatch_display() {
        let e = Error::type_mismatch("expected a list");
        assert_eq!(e.to_string(), "type mismatch: expected a list");
    }

    #[test]
    fn unknown_operation_display() {
        let e = Error::unknown_operation("notARealOp");
        let display = e.to_string();
        assert!(display.contains("[notARealOp]"));
        assert!(display.contains("does not exist"));
    }

    #[test]
    fn unknown_method_display() {
        let e = Error::UnknownMethod {
            class: "User".to_string(),
            method: "fly".to_string(),
        };
        assert_eq!(e.to_string(), "method User::fly does not exist");
    }

    #[test]
    fn invalid_path_display() {
        let e = Error::invalid_path("null path");
        assert!(e.to_string().contains("invalid path"));
        assert!(e.to_string().contains("null path"));
    }

    #[test]
    fn json_error_has_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: Error = json_err.into();
        assert!(matches!(e, Error::Json(_)));
        assert!(StdError::source(&e).is_some());
    }
}
