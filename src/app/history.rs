//! Undo/Redo-Stacks aus inversen Primitiven.
//!
//! Jede mutierende Editieroperation legt die Operation ab, die sie rückgängig
//! macht. Einträge adressieren Elemente ausschließlich über stabile Schlüssel,
//! da sich Ids zwischen Aufnahme und Wiedergabe ändern können. Gruppen werden
//! durch `NewGroup`-Marker getrennt.

use crate::core::index::KeyIndex;
use crate::core::{
    ConnectionRef, DecorationDefinition, DecorationKey, Endpoints, InsertionMode,
    LogicItemDefinition, LogicItemKey, Offset, OrderedLine, Part, Point, RectFine, SegmentKey,
    SegmentPart, Selection,
};

use super::visible_selection::VisibleSelectionOperation;

/// Selektion über stabile Schlüssel, übersteht Id-Änderungen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StableSelection {
    pub logicitems: Vec<LogicItemKey>,
    pub decorations: Vec<DecorationKey>,
    pub segments: Vec<(SegmentKey, Part)>,
}

impl StableSelection {
    pub fn from_selection(selection: &Selection, keys: &KeyIndex) -> Self {
        Self {
            logicitems: selection
                .selected_logicitems()
                .map(|id| keys.logicitem_key(id))
                .collect(),
            decorations: selection
                .selected_decorations()
                .map(|id| keys.decoration_key(id))
                .collect(),
            segments: selection
                .selected_segment_parts()
                .into_iter()
                .map(|segment_part| (keys.segment_key(segment_part.segment), segment_part.part))
                .collect(),
        }
    }

    pub fn to_selection(&self, keys: &KeyIndex) -> Selection {
        let mut selection = Selection::new();
        for key in &self.logicitems {
            selection.add_logicitem(keys.logicitem_id(*key));
        }
        for key in &self.decorations {
            selection.add_decoration(keys.decoration_id(*key));
        }
        for (key, part) in &self.segments {
            selection.add_segment(SegmentPart {
                segment: keys.segment(*key),
                part: *part,
            });
        }
        selection
    }

    pub fn is_empty(&self) -> bool {
        self.logicitems.is_empty() && self.decorations.is_empty() && self.segments.is_empty()
    }
}

/// Ein inverses Primitiv.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    NewGroup,

    // Logikelemente
    LogicItemCreateTemporary {
        key: LogicItemKey,
        definition: LogicItemDefinition,
        position: Point,
    },
    LogicItemDeleteTemporary {
        key: LogicItemKey,
    },
    LogicItemMoveTemporary {
        key: LogicItemKey,
        dx: i32,
        dy: i32,
    },
    LogicItemToMode {
        key: LogicItemKey,
        mode: InsertionMode,
    },
    LogicItemToggleInverter {
        key: LogicItemKey,
        connection: ConnectionRef,
    },
    LogicItemAddVisibleSelection {
        key: LogicItemKey,
    },
    LogicItemRemoveVisibleSelection {
        key: LogicItemKey,
    },

    // Dekorationen
    DecorationCreateTemporary {
        key: DecorationKey,
        definition: DecorationDefinition,
        position: Point,
    },
    DecorationDeleteTemporary {
        key: DecorationKey,
    },
    DecorationMoveTemporary {
        key: DecorationKey,
        dx: i32,
        dy: i32,
    },
    DecorationToMode {
        key: DecorationKey,
        mode: InsertionMode,
    },
    DecorationSetText {
        key: DecorationKey,
        text: String,
    },
    DecorationAddVisibleSelection {
        key: DecorationKey,
    },
    DecorationRemoveVisibleSelection {
        key: DecorationKey,
    },

    // Segmente
    SegmentCreateTemporary {
        key: SegmentKey,
        line: OrderedLine,
        endpoints: Endpoints,
    },
    SegmentDeleteTemporary {
        key: SegmentKey,
    },
    SegmentMoveTemporary {
        key: SegmentKey,
        dx: i32,
        dy: i32,
    },
    SegmentToCollidingTree {
        key: SegmentKey,
    },
    SegmentToTemporaryTree {
        key: SegmentKey,
    },
    SegmentInsert {
        key: SegmentKey,
    },
    SegmentUninsert {
        key: SegmentKey,
    },
    SegmentMarkValid {
        key: SegmentKey,
        part: Part,
    },
    SegmentUnmarkValid {
        key: SegmentKey,
        part: Part,
    },
    SegmentSetEndpoints {
        key: SegmentKey,
        endpoints: Endpoints,
    },
    /// Verschmilzt zwei Segmente, die Linie von `key_0` liegt vorne.
    SegmentMerge {
        key_0: SegmentKey,
        key_1: SegmentKey,
    },
    /// Teilt bei `offset`, der hintere Teil erhält `new_key`.
    SegmentSplit {
        key: SegmentKey,
        offset: Offset,
        new_key: SegmentKey,
    },
    SegmentAddVisibleSelection {
        key: SegmentKey,
        part: Part,
    },
    SegmentRemoveVisibleSelection {
        key: SegmentKey,
        part: Part,
    },

    // Sichtbare Selektion
    VisibleSelectionClear,
    VisibleSelectionSet {
        selection: StableSelection,
    },
    VisibleSelectionAddOperation {
        operation: VisibleSelectionOperation,
    },
    VisibleSelectionUpdateLast {
        rect: RectFine,
    },
    VisibleSelectionPopLast,
}

impl HistoryEntry {
    pub fn is_new_group(&self) -> bool {
        matches!(self, HistoryEntry::NewGroup)
    }
}

/// Hebt `new` den obersten Eintrag exakt auf?
fn cancels(top: &HistoryEntry, new: &HistoryEntry) -> bool {
    use HistoryEntry as E;

    match (top, new) {
        (E::LogicItemDeleteTemporary { key: a }, E::LogicItemCreateTemporary { key: b, .. }) => {
            a == b
        }
        (E::DecorationDeleteTemporary { key: a }, E::DecorationCreateTemporary { key: b, .. }) => {
            a == b
        }
        (E::SegmentDeleteTemporary { key: a }, E::SegmentCreateTemporary { key: b, .. }) => a == b,

        (E::LogicItemAddVisibleSelection { key: a }, E::LogicItemRemoveVisibleSelection { key: b })
        | (E::LogicItemRemoveVisibleSelection { key: a }, E::LogicItemAddVisibleSelection { key: b }) => {
            a == b
        }
        (
            E::DecorationAddVisibleSelection { key: a },
            E::DecorationRemoveVisibleSelection { key: b },
        )
        | (
            E::DecorationRemoveVisibleSelection { key: a },
            E::DecorationAddVisibleSelection { key: b },
        ) => a == b,
        (
            E::SegmentAddVisibleSelection { key: a, part: pa },
            E::SegmentRemoveVisibleSelection { key: b, part: pb },
        )
        | (
            E::SegmentRemoveVisibleSelection { key: a, part: pa },
            E::SegmentAddVisibleSelection { key: b, part: pb },
        ) => a == b && pa == pb,

        _ => false,
    }
}

/// Ein Undo- oder Redo-Stack.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Legt einen Eintrag ab und fasst ihn mit dem obersten zusammen, wo möglich.
    ///
    /// Über `NewGroup`-Marker hinweg wird nie zusammengefasst.
    pub fn push(&mut self, entry: HistoryEntry) {
        if let Some(top) = self.entries.last_mut() {
            if cancels(top, &entry) {
                self.entries.pop();
                return;
            }

            match (top, &entry) {
                (
                    HistoryEntry::LogicItemMoveTemporary { key, dx, dy },
                    HistoryEntry::LogicItemMoveTemporary {
                        key: new_key,
                        dx: new_dx,
                        dy: new_dy,
                    },
                ) if key == new_key => {
                    *dx += new_dx;
                    *dy += new_dy;
                    if *dx == 0 && *dy == 0 {
                        self.entries.pop();
                    }
                    return;
                }
                (
                    HistoryEntry::DecorationMoveTemporary { key, dx, dy },
                    HistoryEntry::DecorationMoveTemporary {
                        key: new_key,
                        dx: new_dx,
                        dy: new_dy,
                    },
                ) if key == new_key => {
                    *dx += new_dx;
                    *dy += new_dy;
                    if *dx == 0 && *dy == 0 {
                        self.entries.pop();
                    }
                    return;
                }
                (
                    HistoryEntry::SegmentMoveTemporary { key, dx, dy },
                    HistoryEntry::SegmentMoveTemporary {
                        key: new_key,
                        dx: new_dx,
                        dy: new_dy,
                    },
                ) if key == new_key => {
                    *dx += new_dx;
                    *dy += new_dy;
                    if *dx == 0 && *dy == 0 {
                        self.entries.pop();
                    }
                    return;
                }

                // der ältere Modus ist der Zielzustand
                (
                    HistoryEntry::LogicItemToMode { key, .. },
                    HistoryEntry::LogicItemToMode { key: new_key, .. },
                ) if key == new_key => return,
                (
                    HistoryEntry::DecorationToMode { key, .. },
                    HistoryEntry::DecorationToMode { key: new_key, .. },
                ) if key == new_key => return,

                (
                    HistoryEntry::VisibleSelectionUpdateLast { .. },
                    HistoryEntry::VisibleSelectionUpdateLast { .. },
                ) => return,
                _ => {}
            }
        }

        if matches!(entry, HistoryEntry::VisibleSelectionAddOperation { .. }) {
            let updates = self
                .entries
                .iter()
                .rev()
                .take_while(|e| matches!(e, HistoryEntry::VisibleSelectionUpdateLast { .. }))
                .count();
            let pop_index = self.entries.len().checked_sub(updates + 1);
            if let Some(index) = pop_index {
                if matches!(self.entries[index], HistoryEntry::VisibleSelectionPopLast) {
                    self.entries.truncate(index);
                    return;
                }
            }
        }

        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn top(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Gibt es Einträge nach dem letzten Gruppen-Marker?
    pub fn has_ungrouped_entries(&self) -> bool {
        self.entries.last().is_some_and(|entry| !entry.is_new_group())
    }

    /// Schließt die offene Gruppe, falls sie Einträge enthält.
    pub fn push_new_group(&mut self) -> bool {
        if self.has_ungrouped_entries() {
            self.entries.push(HistoryEntry::NewGroup);
            return true;
        }
        false
    }

    /// Entfernt abschließende Gruppen-Marker.
    pub fn pop_new_groups(&mut self) {
        while self.entries.last().is_some_and(HistoryEntry::is_new_group) {
            self.entries.pop();
        }
    }

    /// Anzahl abgeschlossener Gruppen.
    pub fn group_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_new_group()).count()
    }

    /// Entnimmt die letzte Gruppe, oberster Eintrag zuerst.
    pub fn take_last_group(&mut self) -> Vec<HistoryEntry> {
        self.pop_new_groups();

        let mut group = Vec::new();
        while let Some(entry) = self.entries.pop() {
            if entry.is_new_group() {
                self.entries.push(entry);
                break;
            }
            group.push(entry);
        }
        group
    }
}

/// Wohin neue Einträge geschrieben werden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryState {
    #[default]
    Disabled,
    /// Neue Bearbeitung, leert den Redo-Stack.
    TrackUndoNew,
    /// Redo läuft und schreibt in den Undo-Stack.
    TrackUndoReplay,
    /// Undo läuft und schreibt in den Redo-Stack.
    TrackRedoReplay,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct History {
    undo_stack: HistoryStack,
    redo_stack: HistoryStack,
    state: HistoryState,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HistoryState {
        self.state
    }

    pub fn set_state(&mut self, state: HistoryState) {
        self.state = state;
    }

    pub fn is_enabled(&self) -> bool {
        self.state != HistoryState::Disabled
    }

    pub fn enable(&mut self) {
        if self.state == HistoryState::Disabled {
            self.state = HistoryState::TrackUndoNew;
        }
    }

    pub fn undo_stack(&self) -> &HistoryStack {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &HistoryStack {
        &self.redo_stack
    }

    pub fn undo_stack_mut(&mut self) -> &mut HistoryStack {
        &mut self.undo_stack
    }

    pub fn redo_stack_mut(&mut self) -> &mut HistoryStack {
        &mut self.redo_stack
    }

    /// Stack, in den der aktuelle Zustand schreibt.
    pub fn get_stack(&mut self) -> Option<&mut HistoryStack> {
        match self.state {
            HistoryState::Disabled => None,
            HistoryState::TrackUndoNew => {
                self.redo_stack.clear();
                Some(&mut self.undo_stack)
            }
            HistoryState::TrackUndoReplay => Some(&mut self.undo_stack),
            HistoryState::TrackRedoReplay => Some(&mut self.redo_stack),
        }
    }

    /// Legt einen Eintrag ab, falls die History aktiv ist.
    pub fn push(&mut self, entry: HistoryEntry) {
        if let Some(stack) = self.get_stack() {
            stack.push(entry);
        }
    }

    pub fn finish_undo_group(&mut self) -> bool {
        self.undo_stack.push_new_group()
    }

    pub fn reopen_undo_group(&mut self) {
        self.undo_stack.pop_new_groups();
    }

    pub fn has_undo(&self) -> bool {
        self.undo_stack.group_count() > 0 || self.undo_stack.has_ungrouped_entries()
    }

    pub fn has_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn has_ungrouped_undo_entries(&self) -> bool {
        self.undo_stack.has_ungrouped_entries()
    }

    pub fn undo_groups_count(&self) -> usize {
        self.undo_stack.group_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Orientation;
    use crate::core::LogicItemType;
    use crate::app::visible_selection::SelectionFunction;

    fn definition() -> LogicItemDefinition {
        LogicItemDefinition::new(LogicItemType::AndElement, 2, Orientation::Right)
    }

    #[test]
    fn create_after_delete_cancels() {
        let mut stack = HistoryStack::new();
        stack.push(HistoryEntry::LogicItemDeleteTemporary {
            key: LogicItemKey(4),
        });
        stack.push(HistoryEntry::LogicItemCreateTemporary {
            key: LogicItemKey(4),
            definition: definition(),
            position: Point::new(0, 0),
        });
        assert!(stack.is_empty());
    }

    #[test]
    fn moves_accumulate_and_vanish_at_zero() {
        let mut stack = HistoryStack::new();
        let key = SegmentKey(1);
        stack.push(HistoryEntry::SegmentMoveTemporary { key, dx: 2, dy: 0 });
        stack.push(HistoryEntry::SegmentMoveTemporary { key, dx: 3, dy: 1 });
        assert_eq!(
            stack.top(),
            Some(&HistoryEntry::SegmentMoveTemporary { key, dx: 5, dy: 1 })
        );

        stack.push(HistoryEntry::SegmentMoveTemporary { key, dx: -5, dy: -1 });
        assert!(stack.is_empty());
    }

    #[test]
    fn no_merging_across_groups() {
        let mut stack = HistoryStack::new();
        let key = LogicItemKey(0);
        stack.push(HistoryEntry::LogicItemMoveTemporary { key, dx: 1, dy: 0 });
        assert!(stack.push_new_group());
        stack.push(HistoryEntry::LogicItemMoveTemporary { key, dx: 1, dy: 0 });

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.group_count(), 1);
        assert!(stack.has_ungrouped_entries());
    }

    #[test]
    fn older_mode_is_kept() {
        let mut stack = HistoryStack::new();
        let key = LogicItemKey(2);
        stack.push(HistoryEntry::LogicItemToMode {
            key,
            mode: InsertionMode::Temporary,
        });
        stack.push(HistoryEntry::LogicItemToMode {
            key,
            mode: InsertionMode::Collisions,
        });
        assert_eq!(
            stack.entries(),
            &[HistoryEntry::LogicItemToMode {
                key,
                mode: InsertionMode::Temporary
            }]
        );
    }

    #[test]
    fn add_operation_removes_pop_with_updates() {
        let mut stack = HistoryStack::new();
        stack.push(HistoryEntry::VisibleSelectionPopLast);
        stack.push(HistoryEntry::VisibleSelectionUpdateLast {
            rect: RectFine::default(),
        });
        stack.push(HistoryEntry::VisibleSelectionUpdateLast {
            rect: RectFine::default(),
        });
        assert_eq!(stack.len(), 2);

        stack.push(HistoryEntry::VisibleSelectionAddOperation {
            operation: VisibleSelectionOperation {
                function: SelectionFunction::Add,
                rect: RectFine::default(),
            },
        });
        assert!(stack.is_empty());
    }

    #[test]
    fn take_last_group_skips_trailing_markers() {
        let mut stack = HistoryStack::new();
        stack.push(HistoryEntry::SegmentInsert { key: SegmentKey(0) });
        stack.push_new_group();
        stack.push(HistoryEntry::SegmentInsert { key: SegmentKey(1) });
        stack.push(HistoryEntry::SegmentInsert { key: SegmentKey(2) });
        stack.push_new_group();

        let group = stack.take_last_group();
        assert_eq!(
            group,
            vec![
                HistoryEntry::SegmentInsert { key: SegmentKey(2) },
                HistoryEntry::SegmentInsert { key: SegmentKey(1) },
            ]
        );
        assert_eq!(stack.group_count(), 1);
        assert!(!stack.has_ungrouped_entries());
    }

    #[test]
    fn new_edits_clear_redo() {
        let mut history = History::new();
        assert!(history.get_stack().is_none());

        history.enable();
        history.set_state(HistoryState::TrackRedoReplay);
        history.push(HistoryEntry::SegmentInsert { key: SegmentKey(0) });
        assert!(history.has_redo());

        history.set_state(HistoryState::TrackUndoNew);
        history.push(HistoryEntry::SegmentInsert { key: SegmentKey(1) });
        assert!(!history.has_redo());
        assert!(history.has_ungrouped_undo_entries());
    }
}
