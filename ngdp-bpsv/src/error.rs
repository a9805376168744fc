//! Error types for PSV manifest parsing

use thiserror::Error;

/// Result type for PSV operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a PSV manifest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Error parsing a field type specification (`NAME!TYPE:len`)
    #[error("invalid field type: {field_type}")]
    InvalidFieldType { field_type: String },

    /// Error parsing the header line
    #[error("invalid header format: {reason}")]
    InvalidHeader { reason: String },

    /// Document has no rows and no header
    #[error("document is empty")]
    EmptyDocument,

    /// Field not found in schema
    #[error("field '{field}' not found in schema")]
    FieldNotFound { field: String },

    /// Duplicate field name in header
    #[error("duplicate field name: {field}")]
    DuplicateField { field: String },
}
