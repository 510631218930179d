//! Host boundary for extstore.
//!
//! Declares the capabilities record logic needs from a host application
//! (schema registry, per-element record storage, transactions, interactive
//! selection, user notices) and provides an in-process implementation of
//! each, so the commands run without the real application.
//!
//! The in-memory host keeps its state behind mutexes: every type here is
//! `Send + Sync` and can sit behind an `Arc` like any other store.

mod capabilities;
mod document;
mod error;
mod file;
mod interaction;
mod registry;

pub use capabilities::{
    Notice, NoticeKind, Notifier, RecordStore, SchemaStore, Selectable, Selection, TransactionalScope,
};
pub use document::{ElementInfo, ElementRecord, MemoryDocument, Transaction};
pub use error::{HostError, HostResult};
pub use file::DocumentFile;
pub use interaction::{RecordingNotifier, ScriptedPicker};
pub use registry::MemorySchemaRegistry;
