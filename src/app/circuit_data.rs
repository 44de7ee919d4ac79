//! Layout plus allen abgeleiteten Zuständen, die über Nachrichten synchron bleiben.

use crate::core::{InfoMessage, KeyIndex, Layout, LayoutIndex};

use super::history::{History, HistoryEntry};
use super::message_log::MessageLog;
use super::selection_store::SelectionStore;
use super::visible_selection::VisibleSelection;

/// Besitzt das Layout und verteilt jede Änderungsnachricht an alle Abnehmer.
///
/// Editieroperationen ändern zuerst das Layout und verschicken danach die
/// beschreibenden Nachrichten über [`CircuitData::submit`].
#[derive(Debug, Clone, Default)]
pub struct CircuitData {
    pub layout: Layout,
    pub index: LayoutIndex,
    pub keys: KeyIndex,
    pub selection_store: SelectionStore,
    pub visible_selection: VisibleSelection,
    pub history: History,
    pub message_log: Option<MessageLog>,
}

impl CircuitData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Übernimmt ein bestehendes Layout und baut alle Indizes auf.
    pub fn from_layout(layout: Layout) -> Self {
        Self {
            index: LayoutIndex::from_layout(&layout),
            keys: KeyIndex::from_layout(&layout),
            layout,
            ..Default::default()
        }
    }

    pub fn submit(&mut self, message: InfoMessage) {
        log::trace!("Nachricht {message}");

        self.index.submit(&message);
        self.keys.submit(&message);
        self.selection_store.submit(&message);
        self.visible_selection.submit(&message);

        if let Some(message_log) = &mut self.message_log {
            message_log.record(&message);
        }
    }

    /// Legt ein inverses Primitiv ab, falls die History aktiv ist.
    pub fn push_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    pub fn is_history_enabled(&self) -> bool {
        self.history.is_enabled()
    }
}
