//! Record commands for extstore.
//!
//! Three responsibilities compose around the host boundary:
//! - [`ensure_schema`]: lookup-or-create of a schema in the registry
//! - [`build_entity`] / [`write_record`]: populate a record and attach it to
//!   an element inside one transaction
//! - [`read_record`]: fetch a record back and extract every field in display
//!   units
//!
//! [`WriteCommand`], [`ReadCommand`] and [`DeleteCommand`] wrap these into the
//! interactive commands a user runs, including selection, notices and the
//! command state machine.

mod command;
mod config;
mod error;
mod reader;
mod registrar;
mod splice;
mod writer;

pub use command::{
    CommandOutcome, CommandReport, CommandState, DeleteCommand, HostContext, PICK_PROMPT, ReadCommand, StateTrail,
    WriteCommand,
};
pub use config::{CommandConfig, DEFAULT_SCHEMA_NAME, DEFAULT_VENDOR_ID, SpliceDefaults};
pub use error::{CommandError, CommandResult};
pub use reader::{ReadOutcome, RecordView, ViewField, read_record, read_with_schema};
pub use registrar::{SchemaRequest, ensure_schema};
pub use splice::{DESCRIPTION, LOCATION, SPLICE_TIME, SpliceRecord, WIRE_LENGTH, splice_schema_request};
pub use writer::{
    DELETE_TRANSACTION, FieldEntry, RecordValues, WRITE_TRANSACTION, build_entity, delete_record, write_record,
};
