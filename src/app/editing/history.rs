//! Wiedergabe von History-Gruppen.
//!
//! Jeder Eintrag wird auf das passende Editier-Primitiv abgebildet. Die
//! Primitive legen dabei ihre eigenen Inversen im Gegenstack ab.

use crate::app::circuit_data::CircuitData;
use crate::app::history::{HistoryEntry, HistoryState};
use crate::core::SegmentPart;

use super::decoration::{
    add_decoration_to_visible_selection, add_temporary_decoration,
    change_decoration_insertion_mode, delete_temporary_decoration,
    move_temporary_decoration_unchecked, remove_decoration_from_visible_selection,
    set_decoration_text,
};
use super::logicitem::{
    add_logicitem_to_visible_selection, add_temporary_logicitem, change_logicitem_insertion_mode,
    delete_temporary_logicitem, move_temporary_logicitem_unchecked,
    remove_logicitem_from_visible_selection, toggle_logicitem_inverter,
};
use super::visible_selection::{
    add_visible_selection_rect, clear_visible_selection, pop_last_visible_selection_rect,
    set_visible_selection, update_visible_selection_rect,
};
use super::wire_detail::{
    add_segment_to_visible_selection, add_temporary_segment, delete_temporary_segment,
    insert_full_segment, mark_valid, merge_segments, move_temporary_segment_unchecked,
    remove_segment_from_visible_selection, set_endpoints, split_segment, to_colliding_tree,
    to_temporary_tree, uninsert_full_segment, unmark_valid,
};

fn replay_entry(circuit: &mut CircuitData, entry: HistoryEntry) {
    use HistoryEntry as E;

    match entry {
        E::NewGroup => panic!("Gruppen-Marker innerhalb einer Gruppe"),

        // Logikelemente
        E::LogicItemCreateTemporary {
            key,
            definition,
            position,
        } => {
            add_temporary_logicitem(circuit, definition, position, Some(key));
        }
        E::LogicItemDeleteTemporary { key } => {
            let logicitem_id = circuit.keys.logicitem_id(key);
            delete_temporary_logicitem(circuit, logicitem_id);
        }
        E::LogicItemMoveTemporary { key, dx, dy } => {
            let logicitem_id = circuit.keys.logicitem_id(key);
            move_temporary_logicitem_unchecked(circuit, logicitem_id, dx, dy);
        }
        E::LogicItemToMode { key, mode } => {
            let logicitem_id = circuit.keys.logicitem_id(key);
            change_logicitem_insertion_mode(circuit, logicitem_id, mode);
        }
        E::LogicItemToggleInverter { key, connection } => {
            let logicitem_id = circuit.keys.logicitem_id(key);
            toggle_logicitem_inverter(circuit, logicitem_id, connection);
        }
        E::LogicItemAddVisibleSelection { key } => {
            let logicitem_id = circuit.keys.logicitem_id(key);
            add_logicitem_to_visible_selection(circuit, logicitem_id);
        }
        E::LogicItemRemoveVisibleSelection { key } => {
            let logicitem_id = circuit.keys.logicitem_id(key);
            remove_logicitem_from_visible_selection(circuit, logicitem_id);
        }

        // Dekorationen
        E::DecorationCreateTemporary {
            key,
            definition,
            position,
        } => {
            add_temporary_decoration(circuit, definition, position, Some(key));
        }
        E::DecorationDeleteTemporary { key } => {
            let decoration_id = circuit.keys.decoration_id(key);
            delete_temporary_decoration(circuit, decoration_id);
        }
        E::DecorationMoveTemporary { key, dx, dy } => {
            let decoration_id = circuit.keys.decoration_id(key);
            move_temporary_decoration_unchecked(circuit, decoration_id, dx, dy);
        }
        E::DecorationToMode { key, mode } => {
            let decoration_id = circuit.keys.decoration_id(key);
            change_decoration_insertion_mode(circuit, decoration_id, mode);
        }
        E::DecorationSetText { key, text } => {
            let decoration_id = circuit.keys.decoration_id(key);
            set_decoration_text(circuit, decoration_id, text);
        }
        E::DecorationAddVisibleSelection { key } => {
            let decoration_id = circuit.keys.decoration_id(key);
            add_decoration_to_visible_selection(circuit, decoration_id);
        }
        E::DecorationRemoveVisibleSelection { key } => {
            let decoration_id = circuit.keys.decoration_id(key);
            remove_decoration_from_visible_selection(circuit, decoration_id);
        }

        // Segmente
        E::SegmentCreateTemporary {
            key,
            line,
            endpoints,
        } => {
            add_temporary_segment(circuit, line, endpoints, Some(key));
        }
        E::SegmentDeleteTemporary { key } => {
            let segment = circuit.keys.segment(key);
            delete_temporary_segment(circuit, segment);
        }
        E::SegmentMoveTemporary { key, dx, dy } => {
            let segment = circuit.keys.segment(key);
            move_temporary_segment_unchecked(circuit, segment, dx, dy);
        }
        E::SegmentToCollidingTree { key } => {
            let segment = circuit.keys.segment(key);
            to_colliding_tree(circuit, segment);
        }
        E::SegmentToTemporaryTree { key } => {
            let segment = circuit.keys.segment(key);
            to_temporary_tree(circuit, segment);
        }
        E::SegmentInsert { key } => {
            let segment = circuit.keys.segment(key);
            insert_full_segment(circuit, segment);
        }
        E::SegmentUninsert { key } => {
            let segment = circuit.keys.segment(key);
            uninsert_full_segment(circuit, segment);
        }
        E::SegmentMarkValid { key, part } => {
            let segment = circuit.keys.segment(key);
            mark_valid(circuit, SegmentPart { segment, part });
        }
        E::SegmentUnmarkValid { key, part } => {
            let segment = circuit.keys.segment(key);
            unmark_valid(circuit, SegmentPart { segment, part });
        }
        E::SegmentSetEndpoints { key, endpoints } => {
            let segment = circuit.keys.segment(key);
            set_endpoints(circuit, segment, endpoints);
        }
        E::SegmentMerge { key_0, key_1 } => {
            let segment_0 = circuit.keys.segment(key_0);
            let segment_1 = circuit.keys.segment(key_1);
            merge_segments(circuit, segment_0, segment_1);
        }
        E::SegmentSplit {
            key,
            offset,
            new_key,
        } => {
            let segment = circuit.keys.segment(key);
            split_segment(circuit, segment, offset, Some(new_key));
        }
        E::SegmentAddVisibleSelection { key, part } => {
            let segment = circuit.keys.segment(key);
            add_segment_to_visible_selection(circuit, SegmentPart { segment, part });
        }
        E::SegmentRemoveVisibleSelection { key, part } => {
            let segment = circuit.keys.segment(key);
            remove_segment_from_visible_selection(circuit, SegmentPart { segment, part });
        }

        // Sichtbare Selektion
        E::VisibleSelectionClear => clear_visible_selection(circuit),
        E::VisibleSelectionSet { selection } => {
            let selection = selection.to_selection(&circuit.keys);
            set_visible_selection(circuit, selection);
        }
        E::VisibleSelectionAddOperation { operation } => {
            add_visible_selection_rect(circuit, operation.function, operation.rect);
        }
        E::VisibleSelectionUpdateLast { rect } => update_visible_selection_rect(circuit, rect),
        E::VisibleSelectionPopLast => pop_last_visible_selection_rect(circuit),
    }
}

fn replay_group(circuit: &mut CircuitData, undo: bool) -> bool {
    let previous = circuit.history.state();
    if previous == HistoryState::Disabled {
        return false;
    }

    let group = if undo {
        circuit.history.undo_stack_mut().take_last_group()
    } else {
        circuit.history.redo_stack_mut().take_last_group()
    };
    if group.is_empty() {
        return false;
    }
    log::debug!(
        "{} von {} Einträgen",
        if undo { "Undo" } else { "Redo" },
        group.len()
    );

    circuit.history.set_state(if undo {
        HistoryState::TrackRedoReplay
    } else {
        HistoryState::TrackUndoReplay
    });
    for entry in group {
        replay_entry(circuit, entry);
    }
    if undo {
        circuit.history.redo_stack_mut().push_new_group();
    } else {
        circuit.history.undo_stack_mut().push_new_group();
    }
    circuit.history.set_state(previous);
    true
}

/// Macht die letzte abgeschlossene Gruppe rückgängig.
pub fn undo_group(circuit: &mut CircuitData) -> bool {
    replay_group(circuit, true)
}

/// Stellt die zuletzt rückgängig gemachte Gruppe wieder her.
pub fn redo_group(circuit: &mut CircuitData) -> bool {
    replay_group(circuit, false)
}
