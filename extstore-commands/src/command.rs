//! The user-invocable commands.
//!
//! Each command walks `Idle -> Selecting -> {Cancelled | Selected} ->
//! Processing -> {Done | Failed}`. Expected negative outcomes end in `Done`
//! (or `Cancelled`) with a notice; anything unexpected is shown to the user
//! and then returned as an error so the caller sees it too.

use chrono::{DateTime, FixedOffset, Local};
use extstore_host::{Notice, Notifier, RecordStore, SchemaStore, Selectable, Selection, TransactionalScope};
use extstore_types::{ElementId, SchemaId};
use tracing::{debug, error};

use crate::{
    CommandConfig, CommandError, CommandResult, ReadOutcome, RecordView, SpliceRecord, build_entity, delete_record,
    ensure_schema, read_with_schema, splice_schema_request, write_record,
};

pub const PICK_PROMPT: &str = "Please select an element";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Idle,
    Selecting,
    Cancelled,
    Selected,
    Processing,
    Done,
    Failed,
}

impl CommandState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CommandState::Cancelled | CommandState::Done | CommandState::Failed)
    }

    pub fn can_advance_to(self, next: CommandState) -> bool {
        use CommandState::*;
        match (self, next) {
            (Idle, Selecting) | (Selecting, Cancelled) | (Selecting, Selected) => true,
            (Selected, Processing) | (Processing, Done) => true,
            // Nothing to select when the schema is missing.
            (Idle, Done) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// States a command has passed through, starting at `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTrail {
    states: Vec<CommandState>,
}

impl StateTrail {
    pub fn new() -> Self {
        Self {
            states: vec![CommandState::Idle],
        }
    }

    pub fn current(&self) -> CommandState {
        self.states.last().copied().unwrap_or(CommandState::Idle)
    }

    pub fn states(&self) -> &[CommandState] {
        &self.states
    }

    pub fn advance(&mut self, next: CommandState) -> CommandResult<()> {
        let from = self.current();
        if !from.can_advance_to(next) {
            return Err(CommandError::IllegalTransition { from, to: next });
        }
        debug!(?from, to = ?next, "Command state");
        self.states.push(next);
        Ok(())
    }
}

impl Default for StateTrail {
    fn default() -> Self {
        Self::new()
    }
}

/// How a command ended, when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Cancelled,
    SchemaNotFound { name: String, vendor_id: String },
    InvalidObject(ElementId),
    NoData(ElementId),
    Found(RecordView),
    Written { element: ElementId, schema_id: SchemaId },
    Deleted { element: ElementId },
}

impl From<ReadOutcome> for CommandOutcome {
    fn from(outcome: ReadOutcome) -> Self {
        match outcome {
            ReadOutcome::SchemaNotFound { name, vendor_id } => CommandOutcome::SchemaNotFound { name, vendor_id },
            ReadOutcome::InvalidObject(e) => CommandOutcome::InvalidObject(e),
            ReadOutcome::NoData(e) => CommandOutcome::NoData(e),
            ReadOutcome::Found(view) => CommandOutcome::Found(view),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandReport {
    pub outcome: CommandOutcome,
    pub trail: StateTrail,
}

/// The host capabilities a command runs against.
#[derive(Clone, Copy)]
pub struct HostContext<'a> {
    pub schemas: &'a dyn SchemaStore,
    pub records: &'a dyn RecordStore,
    pub scope: &'a dyn TransactionalScope,
    pub picker: &'a dyn Selectable,
    pub notifier: &'a dyn Notifier,
}

impl HostContext<'_> {
    fn notify(&self, notice: Notice) {
        self.notifier.notify(&notice);
    }

    fn pick(&self, trail: &mut StateTrail, cancel_message: &str) -> CommandResult<Option<ElementId>> {
        trail.advance(CommandState::Selecting)?;
        match self.picker.pick_one(PICK_PROMPT)? {
            Selection::Picked(element) => {
                trail.advance(CommandState::Selected)?;
                Ok(Some(element))
            }
            Selection::Cancelled => {
                trail.advance(CommandState::Cancelled)?;
                self.notify(Notice::info("Canceled", cancel_message));
                Ok(None)
            }
        }
    }

    fn schema_not_found(&self, trail: &mut StateTrail, config: &CommandConfig) -> CommandResult<CommandOutcome> {
        self.notify(Notice::warning(
            "Schema Not Found",
            format!("The schema '{}' was not found.", config.schema_name),
        ));
        trail.advance(CommandState::Done)?;
        Ok(CommandOutcome::SchemaNotFound {
            name: config.schema_name.clone(),
            vendor_id: config.vendor_id.clone(),
        })
    }

    fn finish(
        &self,
        command: &str,
        run: impl FnOnce(&mut StateTrail) -> CommandResult<CommandOutcome>,
    ) -> CommandResult<CommandReport> {
        let mut trail = StateTrail::new();
        match run(&mut trail) {
            Ok(outcome) => Ok(CommandReport { outcome, trail }),
            Err(err) => {
                self.notify(Notice::error("Error", err.to_string()));
                if let Err(transition) = trail.advance(CommandState::Failed) {
                    debug!(%transition, "Failure recorded after terminal state");
                }
                error!(command, trail = ?trail.states(), error = %err, "Command failed");
                Err(err)
            }
        }
    }
}

/// Registers the splice schema if needed and writes the configured splice
/// record to a selected element.
#[derive(Debug, Clone)]
pub struct WriteCommand {
    config: CommandConfig,
}

impl WriteCommand {
    pub fn new(config: CommandConfig) -> CommandResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn execute(&self, host: &HostContext<'_>) -> CommandResult<CommandReport> {
        self.execute_at(host, Local::now().fixed_offset())
    }

    /// Like [`execute`](Self::execute), with an explicit splice time.
    pub fn execute_at(&self, host: &HostContext<'_>, now: DateTime<FixedOffset>) -> CommandResult<CommandReport> {
        host.finish("write", |trail| {
            let schema = ensure_schema(host.schemas, &splice_schema_request(&self.config))?;
            let record = SpliceRecord::from_config(&self.config, now);
            let entity = build_entity(&schema, &record.to_values(self.config.display_unit))?;

            let Some(element) = host.pick(trail, "Operation was canceled by user.")? else {
                return Ok(CommandOutcome::Cancelled);
            };
            trail.advance(CommandState::Processing)?;
            write_record(host.scope, host.records, &entity, element)?;
            trail.advance(CommandState::Done)?;
            host.notify(Notice::info(
                "Extensible Storage",
                format!("Splice data written to element {element}."),
            ));
            Ok(CommandOutcome::Written {
                element,
                schema_id: schema.id(),
            })
        })
    }
}

/// Reads the splice record from a selected element and shows it.
#[derive(Debug, Clone)]
pub struct ReadCommand {
    config: CommandConfig,
}

impl ReadCommand {
    pub fn new(config: CommandConfig) -> CommandResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn execute(&self, host: &HostContext<'_>) -> CommandResult<CommandReport> {
        host.finish("read", |trail| {
            let config = &self.config;
            let Some(schema) = host.schemas.lookup(&config.schema_name, &config.vendor_id)? else {
                return host.schema_not_found(trail, config);
            };
            let Some(element) = host.pick(trail, "Operation canceled by user.")? else {
                return Ok(CommandOutcome::Cancelled);
            };
            trail.advance(CommandState::Processing)?;

            let outcome = read_with_schema(host.records, &schema, element, config.display_unit)?;
            match &outcome {
                ReadOutcome::Found(view) => {
                    let splice = SpliceRecord::from_view(view)?;
                    host.notify(Notice::info("Wire Splice Info", splice.render(config.display_unit)));
                }
                ReadOutcome::InvalidObject(_) => host.notify(Notice::warning(
                    "Invalid Element",
                    "The selected element cannot store external data.",
                )),
                ReadOutcome::NoData(_) => host.notify(Notice::info(
                    "No Data",
                    "This element does not contain extensible storage data.",
                )),
                ReadOutcome::SchemaNotFound { .. } => {}
            }
            trail.advance(CommandState::Done)?;
            Ok(outcome.into())
        })
    }
}

/// Removes the splice record from a selected element.
#[derive(Debug, Clone)]
pub struct DeleteCommand {
    config: CommandConfig,
}

impl DeleteCommand {
    pub fn new(config: CommandConfig) -> CommandResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn execute(&self, host: &HostContext<'_>) -> CommandResult<CommandReport> {
        host.finish("delete", |trail| {
            let config = &self.config;
            let Some(schema) = host.schemas.lookup(&config.schema_name, &config.vendor_id)? else {
                return host.schema_not_found(trail, config);
            };
            let Some(element) = host.pick(trail, "Operation canceled by user.")? else {
                return Ok(CommandOutcome::Cancelled);
            };
            trail.advance(CommandState::Processing)?;

            let outcome = if !host.records.is_valid_object(element)? {
                host.notify(Notice::warning(
                    "Invalid Element",
                    "The selected element cannot store external data.",
                ));
                CommandOutcome::InvalidObject(element)
            } else if delete_record(host.scope, host.records, &schema, element)? {
                host.notify(Notice::info(
                    "Extensible Storage",
                    format!("Splice data removed from element {element}."),
                ));
                CommandOutcome::Deleted { element }
            } else {
                host.notify(Notice::info(
                    "No Data",
                    "This element does not contain extensible storage data.",
                ));
                CommandOutcome::NoData(element)
            };
            trail.advance(CommandState::Done)?;
            Ok(outcome)
        })
    }
}
