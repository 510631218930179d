use std::io::Cursor;

use extstore_cli::{ConsoleNotifier, PromptPicker};
use extstore_host::{Notice, Notifier, Selectable, Selection};
use extstore_types::ElementId;
use pretty_assertions::assert_eq;

fn pick(input: &str) -> (Selection, String) {
    let picker = PromptPicker::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let selection = picker.pick_one("Please select an element").unwrap();
    let (_, output) = picker.into_inner();
    (selection, String::from_utf8(output).unwrap())
}

#[test]
fn picks_typed_element_id() {
    let (selection, output) = pick("1004\n");
    assert_eq!(selection, Selection::Picked(ElementId::new(1004)));
    assert!(output.starts_with("Please select an element"));
}

#[test]
fn empty_line_cancels() {
    assert_eq!(pick("\n").0, Selection::Cancelled);
}

#[test]
fn q_cancels() {
    assert_eq!(pick("q\n").0, Selection::Cancelled);
    assert_eq!(pick(" Q \n").0, Selection::Cancelled);
}

#[test]
fn end_of_input_cancels() {
    assert_eq!(pick("").0, Selection::Cancelled);
}

#[test]
fn invalid_answer_is_asked_again() {
    let (selection, output) = pick("wall\n1001\n");
    assert_eq!(selection, Selection::Picked(ElementId::new(1001)));
    assert_eq!(output.matches("Please select an element").count(), 2);
}

#[test]
fn notices_print_title_and_message() {
    let notifier = ConsoleNotifier::new(Vec::new());
    notifier.notify(&Notice::info("No Data", "This element does not contain extensible storage data."));
    notifier.notify(&Notice::error("Error", "host error: locked"));

    let output = String::from_utf8(notifier.into_inner()).unwrap();
    assert_eq!(
        output,
        "== No Data ==\nThis element does not contain extensible storage data.\n\
         == Error (error) ==\nhost error: locked\n"
    );
}
