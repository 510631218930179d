//! Shared test helpers for command tests.

#![allow(dead_code)]

use extstore_commands::{CommandConfig, HostContext};
use extstore_host::{MemoryDocument, MemorySchemaRegistry, RecordingNotifier, ScriptedPicker, Selection};
use extstore_types::ElementId;

/// An in-memory host whose user answers prompts from a script.
pub struct TestHost {
    pub registry: MemorySchemaRegistry,
    pub document: MemoryDocument,
    pub picker: ScriptedPicker,
    pub notifier: RecordingNotifier,
}

impl TestHost {
    pub fn new(answers: impl IntoIterator<Item = Selection>) -> Self {
        Self {
            registry: MemorySchemaRegistry::new(),
            document: MemoryDocument::new(&CommandConfig::default().vendor_id),
            picker: ScriptedPicker::new(answers),
            notifier: RecordingNotifier::new(),
        }
    }

    /// A host with one element, selected once per queued answer.
    pub fn with_element(picks: usize) -> (Self, ElementId) {
        let host = Self::new([]);
        let element = host.document.add_element("Junction Box").unwrap();
        let host = Self {
            picker: ScriptedPicker::new(std::iter::repeat_n(Selection::Picked(element), picks)),
            ..host
        };
        (host, element)
    }

    pub fn context(&self) -> HostContext<'_> {
        HostContext {
            schemas: &self.registry,
            records: &self.document,
            scope: &self.document,
            picker: &self.picker,
            notifier: &self.notifier,
        }
    }

    pub fn last_title(&self) -> String {
        self.notifier.last().map(|n| n.title).unwrap_or_default()
    }
}
