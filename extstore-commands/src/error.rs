//! Error types for the command layer.

use extstore_host::HostError;
use extstore_model::ModelError;
use thiserror::Error;

use crate::CommandState;

/// Result type for command operations.
pub type CommandResult<T> = Result<T, CommandError>;

/// Unexpected failures. Expected negative outcomes (cancelled selection,
/// missing schema, missing record) are not errors; see
/// [`CommandOutcome`](crate::CommandOutcome).
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("no value supplied for fields: {}", .0.join(", "))]
    MissingFieldValues(Vec<String>),

    #[error("illegal command state change {from:?} -> {to:?}")]
    IllegalTransition { from: CommandState, to: CommandState },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
