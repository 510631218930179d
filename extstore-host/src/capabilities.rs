//! The capabilities extstore needs from a host application.
//!
//! Record logic only ever talks to these traits. A real host binding
//! implements them over its SDK; [`MemorySchemaRegistry`](crate::MemorySchemaRegistry)
//! and [`MemoryDocument`](crate::MemoryDocument) implement them in-process.

use extstore_model::{Entity, SchemaDescriptor};
use extstore_types::{ElementId, SchemaId};
use serde::{Deserialize, Serialize};

use crate::HostResult;

/// The host's global schema registry.
pub trait SchemaStore {
    /// Finds the schema registered under `(name, vendor_id)`.
    fn lookup(&self, name: &str, vendor_id: &str) -> HostResult<Option<SchemaDescriptor>>;

    fn lookup_by_id(&self, id: SchemaId) -> HostResult<Option<SchemaDescriptor>>;

    /// Commits a finished schema. Returns the descriptor as registered.
    fn register(&self, schema: SchemaDescriptor) -> HostResult<SchemaDescriptor>;

    /// Every registered schema, in registration order.
    fn list(&self) -> HostResult<Vec<SchemaDescriptor>>;
}

/// Per-element record storage.
pub trait RecordStore {
    /// Whether `element` still exists and can carry records.
    fn is_valid_object(&self, element: ElementId) -> HostResult<bool>;

    /// The record attached to `element` for `schema`, if any.
    fn get(&self, element: ElementId, schema: &SchemaDescriptor) -> HostResult<Option<Entity>>;

    /// Attaches `entity`, replacing any record of the same schema.
    fn set(&self, element: ElementId, entity: Entity) -> HostResult<()>;

    /// Removes the record for `schema`. Returns whether one was attached.
    fn delete(&self, element: ElementId, schema: &SchemaDescriptor) -> HostResult<bool>;

    /// Schemas that have a record on `element`.
    fn schemas_on(&self, element: ElementId) -> HostResult<Vec<SchemaId>>;
}

/// Outcome of an interactive selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Picked(ElementId),
    /// The user dismissed the prompt. Not an error.
    Cancelled,
}

/// Interactive element selection. Blocks until the user answers.
pub trait Selectable {
    fn pick_one(&self, prompt: &str) -> HostResult<Selection>;
}

/// Atomic modification scope.
///
/// `run` commits if `work` returns `Ok` and rolls everything `work` did back
/// otherwise.
pub trait TransactionalScope {
    fn run(&self, name: &str, work: &mut dyn FnMut() -> HostResult<()>) -> HostResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// The host's dialog surface.
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}
