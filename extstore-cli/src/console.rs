//! Terminal implementations of selection and notices.

use std::io::{BufRead, Write};
use std::sync::{Mutex, PoisonError};

use extstore_host::{HostResult, Notice, NoticeKind, Notifier, Selectable, Selection};
use extstore_types::ElementId;
use tracing::warn;

/// Asks for an element id on a line-oriented terminal.
///
/// An empty line, `q`, or end of input cancels. Anything that is not an
/// element id is reported and asked again.
pub struct PromptPicker<R, W> {
    io: Mutex<(R, W)>,
}

impl<R: BufRead, W: Write> PromptPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }

    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: BufRead, W: Write> Selectable for PromptPicker<R, W> {
    fn pick_one(&self, prompt: &str) -> HostResult<Selection> {
        let mut io = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        let (input, output) = &mut *io;
        loop {
            write!(output, "{prompt} (element id, empty or q to cancel): ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                return Ok(Selection::Cancelled);
            }
            let answer = line.trim();
            if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
                return Ok(Selection::Cancelled);
            }
            match answer.parse::<ElementId>() {
                Ok(element) => return Ok(Selection::Picked(element)),
                Err(err) => writeln!(output, "{err}")?,
            }
        }
    }
}

/// Prints notices as a titled block.
pub struct ConsoleNotifier<W> {
    output: Mutex<W>,
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(output: W) -> Self {
        Self {
            output: Mutex::new(output),
        }
    }

    pub fn into_inner(self) -> W {
        self.output.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_notice(&self, notice: &Notice) -> std::io::Result<()> {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        let marker = match notice.kind {
            NoticeKind::Info => "",
            NoticeKind::Warning => " (warning)",
            NoticeKind::Error => " (error)",
        };
        writeln!(output, "== {}{} ==", notice.title, marker)?;
        writeln!(output, "{}", notice.message)?;
        output.flush()
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn notify(&self, notice: &Notice) {
        if let Err(err) = self.write_notice(notice) {
            warn!(title = %notice.title, error = %err, "Failed to show notice");
        }
    }
}
