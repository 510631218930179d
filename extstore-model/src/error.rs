//! Error types for schema construction and entity access.

use extstore_types::{UnitCategory, UnitType};
use thiserror::Error;

use crate::FieldType;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building schemas or accessing entity fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("invalid schema name: {0:?}")]
    InvalidSchemaName(String),

    #[error("schema has no vendor id")]
    MissingVendorId,

    #[error("invalid vendor id: {0:?}")]
    InvalidVendorId(String),

    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),

    #[error("field '{0}' declared more than once")]
    DuplicateField(String),

    /// Only point and scalar fields may carry a unit category.
    #[error("field '{field}' of type {field_type} cannot carry a unit category")]
    UnitNotAllowed { field: String, field_type: FieldType },

    #[error("field '{field}' is not declared in schema '{schema}'")]
    UnknownField { schema: String, field: String },

    #[error("field '{field}' is declared as {expected}, accessed as {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        actual: FieldType,
    },

    /// The value, once in storage units, is NaN or infinite.
    #[error("field '{0}' value is not finite in storage units")]
    NonFinite(String),

    #[error("field '{0}' has no value")]
    FieldNotSet(String),

    #[error("field '{field}' measures {category} and needs a display unit")]
    UnitRequired { field: String, category: UnitCategory },

    #[error("field '{field}' has no unit category, but {unit} was given")]
    UnexpectedUnit { field: String, unit: UnitType },

    #[error("field '{field}' measures {expected}, {actual} is not a {expected} unit")]
    UnitMismatch {
        field: String,
        expected: UnitCategory,
        actual: UnitType,
    },
}
