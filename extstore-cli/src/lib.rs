//! Terminal host for the extstore commands.
//!
//! Backs the host capabilities with a JSON document file, a stdin prompt for
//! element selection, and notices printed to stdout.

mod console;
mod session;

pub use console::{ConsoleNotifier, PromptPicker};
pub use session::Session;
