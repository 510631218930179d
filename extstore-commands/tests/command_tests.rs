mod common;

use chrono::{DateTime, Local, TimeDelta};
use common::TestHost;
use extstore_commands::{
    CommandConfig, CommandError, CommandOutcome, CommandState, DeleteCommand, PICK_PROMPT, ReadCommand,
    SpliceRecord, StateTrail, WriteCommand,
};
use extstore_host::{HostError, NoticeKind, RecordStore, SchemaStore, Selection};
use extstore_model::ModelError;
use extstore_types::{UnitType, Xyz};
use pretty_assertions::assert_eq;

use CommandState::*;

fn write_command() -> WriteCommand {
    WriteCommand::new(CommandConfig::default()).unwrap()
}

fn read_command() -> ReadCommand {
    ReadCommand::new(CommandConfig::default()).unwrap()
}

// ── State machine ────────────────────────────────────────────────

#[test]
fn allowed_transitions() {
    assert!(Idle.can_advance_to(Selecting));
    assert!(Selecting.can_advance_to(Cancelled));
    assert!(Selecting.can_advance_to(Selected));
    assert!(Selected.can_advance_to(Processing));
    assert!(Processing.can_advance_to(Done));
    assert!(Processing.can_advance_to(Failed));
    assert!(Idle.can_advance_to(Failed));
}

#[test]
fn terminal_states_do_not_advance() {
    for terminal in [Cancelled, Done, Failed] {
        assert!(terminal.is_terminal());
        for next in [Idle, Selecting, Selected, Processing, Done, Failed] {
            assert!(!terminal.can_advance_to(next), "{terminal:?} -> {next:?}");
        }
    }
}

#[test]
fn trail_rejects_skipping_selection() {
    let mut trail = StateTrail::new();
    let err = trail.advance(Processing).unwrap_err();
    assert!(matches!(err, CommandError::IllegalTransition { from: Idle, to: Processing }));
    assert_eq!(trail.current(), Idle);
}

// ── Write ────────────────────────────────────────────────────────

#[test]
fn write_then_read_example_scenario() {
    let (host, element) = TestHost::with_element(2);
    let before = Local::now();

    let written = write_command().execute(&host.context()).unwrap();
    assert_eq!(written.trail.states(), &[Idle, Selecting, Selected, Processing, Done]);
    let CommandOutcome::Written { element: target, schema_id } = written.outcome else {
        panic!("unexpected outcome: {:?}", written.outcome);
    };
    assert_eq!(target, element);
    assert_eq!(host.document.transactions_started(), 1);

    let read = read_command().execute(&host.context()).unwrap();
    let CommandOutcome::Found(view) = &read.outcome else {
        panic!("unexpected outcome: {:?}", read.outcome);
    };
    assert_eq!(view.schema_id(), schema_id);

    let splice = SpliceRecord::from_view(view).unwrap();
    assert!(splice.location.is_almost_equal_to(&Xyz::new(1.0, 2.0, 3.0), 1e-6));
    assert!((splice.wire_length - 12.5).abs() < 1e-6);
    assert_eq!(splice.description, "Main splice near junction box");
    let stamped = splice.parsed_time().expect("splice time is RFC 3339");
    let drift = stamped.signed_duration_since(before);
    assert!(drift >= TimeDelta::zero() && drift < TimeDelta::seconds(5), "drift {drift}");

    let shown = host.notifier.last().unwrap();
    assert_eq!(shown.title, "Wire Splice Info");
    assert!(shown.message.contains("- Location: (1.00, 2.00, 3.00)"));
    assert!(shown.message.contains("- Wire Length: 12.50 m"));
    assert!(shown.message.contains("- Description: Main splice near junction box"));
    assert_eq!(host.picker.prompts(), vec![PICK_PROMPT, PICK_PROMPT]);
}

#[test]
fn write_uses_given_timestamp() {
    let (host, element) = TestHost::with_element(1);
    let at = DateTime::parse_from_rfc3339("2026-10-15T08:00:00.250+02:00").unwrap();
    write_command().execute_at(&host.context(), at).unwrap();

    let schema = host.registry.lookup("MySchema", "Khalid").unwrap().unwrap();
    let entity = host.document.get(element, &schema).unwrap().unwrap();
    assert_eq!(entity.get::<String>("SpliceTime").unwrap(), "2026-10-15T08:00:00.250+02:00");
}

#[test]
fn second_write_replaces_record_and_reuses_schema() {
    let (host, element) = TestHost::with_element(2);
    let first = write_command().execute(&host.context()).unwrap();
    let second = write_command().execute(&host.context()).unwrap();
    match (first.outcome, second.outcome) {
        (CommandOutcome::Written { schema_id: a, .. }, CommandOutcome::Written { schema_id: b, .. }) => {
            assert_eq!(a, b)
        }
        other => panic!("unexpected outcomes: {other:?}"),
    }
    assert_eq!(host.registry.len(), 1);
    assert_eq!(host.document.schemas_on(element).unwrap().len(), 1);
}

#[test]
fn cancelled_write_opens_no_transaction() {
    let host = TestHost::new([Selection::Cancelled]);
    let element = host.document.add_element("Wall").unwrap();

    let report = write_command().execute(&host.context()).unwrap();

    assert_eq!(report.outcome, CommandOutcome::Cancelled);
    assert_eq!(report.trail.states(), &[Idle, Selecting, Cancelled]);
    assert_eq!(report.trail.current(), Cancelled);
    assert!(host.document.schemas_on(element).unwrap().is_empty());
    assert_eq!(host.document.transactions_started(), 0);
    let notice = host.notifier.last().unwrap();
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.title, "Canceled");
    // The schema is prepared before the prompt.
    assert_eq!(host.registry.len(), 1);
}

#[test]
fn write_failure_is_notified_and_returned() {
    let (host, element) = TestHost::with_element(1);
    host.document.fail_next_set("element is checked out");

    let err = write_command().execute(&host.context()).unwrap_err();

    assert!(matches!(err, CommandError::Host(HostError::Host(ref m)) if m == "element is checked out"));
    let notice = host.notifier.last().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.title, "Error");
    assert!(notice.message.contains("element is checked out"));
    assert!(host.document.schemas_on(element).unwrap().is_empty());
}

#[test]
fn write_to_deleted_element_fails() {
    let (host, element) = TestHost::with_element(1);
    host.document.delete_element(element).unwrap();
    let err = write_command().execute(&host.context()).unwrap_err();
    assert!(matches!(err, CommandError::Host(HostError::InvalidObject(id)) if id == element));
}

#[test]
fn write_under_foreign_vendor_is_denied() {
    let (host, _) = TestHost::with_element(1);
    let config = CommandConfig {
        vendor_id: "Globex".into(),
        ..CommandConfig::default()
    };
    let err = WriteCommand::new(config)
        .unwrap()
        .execute(&host.context())
        .unwrap_err();
    assert!(matches!(err, CommandError::Host(HostError::WriteAccessDenied { .. })));
}

#[test]
fn write_with_unreachable_registry_fails_before_prompt() {
    let (host, _) = TestHost::with_element(1);
    host.registry.close();
    let err = write_command().execute(&host.context()).unwrap_err();
    assert!(matches!(err, CommandError::Host(HostError::NoActiveDocument)));
    assert!(host.picker.prompts().is_empty());
    assert_eq!(host.last_title(), "Error");
}

#[test]
fn write_of_length_overflowing_storage_unit_fails_before_prompt() {
    let (host, element) = TestHost::with_element(1);
    let mut config = CommandConfig::default();
    config.splice.wire_length = 1.0e308;

    let err = WriteCommand::new(config).unwrap().execute(&host.context()).unwrap_err();

    assert!(matches!(err, CommandError::Model(ModelError::NonFinite(ref f)) if f == "WireLength"));
    assert!(host.picker.prompts().is_empty());
    assert_eq!(host.document.transactions_started(), 0);
    assert!(host.document.schemas_on(element).unwrap().is_empty());
}

#[test]
fn write_in_other_display_unit_reads_back_in_meters() {
    let (host, _) = TestHost::with_element(2);
    let config = CommandConfig {
        display_unit: UnitType::Feet,
        ..CommandConfig::default()
    };
    WriteCommand::new(config).unwrap().execute(&host.context()).unwrap();

    let report = read_command().execute(&host.context()).unwrap();
    let CommandOutcome::Found(view) = report.outcome else {
        panic!("record not found");
    };
    assert!((view.double("WireLength").unwrap() - 12.5 * 0.3048).abs() < 1e-6);
}

// ── Read ─────────────────────────────────────────────────────────

#[test]
fn read_before_write_reports_schema_not_found_without_prompt() {
    let (host, _) = TestHost::with_element(1);

    let report = read_command().execute(&host.context()).unwrap();

    assert_eq!(
        report.outcome,
        CommandOutcome::SchemaNotFound {
            name: "MySchema".into(),
            vendor_id: "Khalid".into(),
        }
    );
    assert_eq!(report.trail.states(), &[Idle, Done]);
    assert!(host.picker.prompts().is_empty());
    let notice = host.notifier.last().unwrap();
    assert_eq!(notice.title, "Schema Not Found");
    assert_eq!(notice.message, "The schema 'MySchema' was not found.");
}

#[test]
fn read_of_element_without_record_is_no_data() {
    let host = TestHost::new([Selection::Cancelled]);
    let bare = host.document.add_element("Bare").unwrap();
    let tagged = host.document.add_element("Tagged").unwrap();
    let host = TestHost {
        picker: extstore_host::ScriptedPicker::new([Selection::Picked(tagged), Selection::Picked(bare)]),
        ..host
    };
    write_command().execute(&host.context()).unwrap();

    let report = read_command().execute(&host.context()).unwrap();

    assert_eq!(report.outcome, CommandOutcome::NoData(bare));
    assert_eq!(report.trail.current(), Done);
    assert_eq!(host.last_title(), "No Data");
}

#[test]
fn read_of_deleted_element_is_invalid_object() {
    let (host, element) = TestHost::with_element(2);
    write_command().execute(&host.context()).unwrap();
    host.document.delete_element(element).unwrap();

    let report = read_command().execute(&host.context()).unwrap();

    assert_eq!(report.outcome, CommandOutcome::InvalidObject(element));
    assert_eq!(host.last_title(), "Invalid Element");
}

#[test]
fn cancelled_read_reads_nothing() {
    let (host, _) = TestHost::with_element(1);
    write_command().execute(&host.context()).unwrap();
    let host = TestHost {
        picker: extstore_host::ScriptedPicker::cancelling(),
        ..host
    };

    let report = read_command().execute(&host.context()).unwrap();

    assert_eq!(report.outcome, CommandOutcome::Cancelled);
    assert_eq!(report.trail.states(), &[Idle, Selecting, Cancelled]);
    assert_eq!(host.notifier.last().unwrap().message, "Operation canceled by user.");
    // Only the earlier write opened one.
    assert_eq!(host.document.transactions_started(), 1);
}

#[test]
fn read_selection_error_propagates() {
    let (host, _) = TestHost::with_element(1);
    write_command().execute(&host.context()).unwrap();

    // The script is exhausted, so the picker itself fails.
    let err = read_command().execute(&host.context()).unwrap_err();
    assert!(matches!(err, CommandError::Host(HostError::Host(_))));
    assert_eq!(host.last_title(), "Error");
}

// ── Delete ───────────────────────────────────────────────────────

#[test]
fn delete_removes_written_record() {
    let (host, element) = TestHost::with_element(3);
    write_command().execute(&host.context()).unwrap();
    let delete = DeleteCommand::new(CommandConfig::default()).unwrap();

    let report = delete.execute(&host.context()).unwrap();
    assert_eq!(report.outcome, CommandOutcome::Deleted { element });

    let report = delete.execute(&host.context()).unwrap();
    assert_eq!(report.outcome, CommandOutcome::NoData(element));
}

// ── Config ───────────────────────────────────────────────────────

#[test]
fn commands_reject_invalid_config() {
    let config = CommandConfig {
        display_unit: UnitType::Degrees,
        ..CommandConfig::default()
    };
    assert!(matches!(WriteCommand::new(config.clone()), Err(CommandError::Config(_))));
    assert!(matches!(ReadCommand::new(config), Err(CommandError::Config(_))));
}
