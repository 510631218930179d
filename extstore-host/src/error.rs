//! Error types for host operations.

use extstore_model::ModelError;
use extstore_types::{ElementId, SchemaId};
use thiserror::Error;

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors reported by the host (or the in-memory stand-in for it).
#[derive(Debug, Error)]
pub enum HostError {
    /// No document is open, so the registry and elements are unreachable.
    #[error("no active document")]
    NoActiveDocument,

    #[error("element not found: {0}")]
    ElementNotFound(ElementId),

    /// Every element id up to `i64::MAX` is taken.
    #[error("no element ids left in this document")]
    ElementIdsExhausted,

    /// The element existed but can no longer be used (e.g. it was deleted).
    #[error("element {0} is not a valid object")]
    InvalidObject(ElementId),

    #[error("schema id {0} is already registered")]
    DuplicateSchemaId(SchemaId),

    /// Another schema already owns this (name, vendor id) pair.
    #[error("schema '{name}' for vendor '{vendor_id}' is already registered as {existing}")]
    SchemaConflict {
        name: String,
        vendor_id: String,
        existing: SchemaId,
    },

    #[error("vendor '{active_vendor}' may not write records of schema '{schema}' owned by '{owner}'")]
    WriteAccessDenied {
        schema: String,
        owner: String,
        active_vendor: String,
    },

    #[error("vendor '{active_vendor}' may not read records of schema '{schema}' owned by '{owner}'")]
    ReadAccessDenied {
        schema: String,
        owner: String,
        active_vendor: String,
    },

    #[error("modifying element records requires an open transaction")]
    TransactionRequired,

    #[error("transaction '{0}' is already open")]
    TransactionAlreadyOpen(String),

    #[error("transaction '{name}' failed to commit: {reason}")]
    CommitFailed { name: String, reason: String },

    /// Generic failure raised by the host.
    #[error("host error: {0}")]
    Host(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
