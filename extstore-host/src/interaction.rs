//! Non-interactive stand-ins for the host's selection prompt and dialogs.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use extstore_types::ElementId;

use crate::{HostError, HostResult, Notice, Notifier, Selectable, Selection};

/// Answers selection prompts from a prepared script.
///
/// Each prompt consumes the next scripted answer; running out is a host
/// error rather than an implicit cancel.
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    answers: Mutex<VecDeque<Selection>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedPicker {
    pub fn new(answers: impl IntoIterator<Item = Selection>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A picker that selects `element` once.
    pub fn picking(element: ElementId) -> Self {
        Self::new([Selection::Picked(element)])
    }

    /// A picker whose user cancels once.
    pub fn cancelling() -> Self {
        Self::new([Selection::Cancelled])
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Selectable for ScriptedPicker {
    fn pick_one(&self, prompt: &str) -> HostResult<Selection> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| HostError::Host("selection script exhausted".into()))
    }
}

/// Keeps every notice for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}
