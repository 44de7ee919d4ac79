//! Änderungen der sichtbaren Selektion mit History.

use crate::app::circuit_data::CircuitData;
use crate::app::history::{HistoryEntry, StableSelection};
use crate::app::visible_selection::{SelectionFunction, VisibleSelectionOperation};
use crate::core::{RectFine, Selection};

/// Legt die Rechteck-Operationen rückwärts ab, damit Undo sie in
/// ursprünglicher Reihenfolge wieder anhängt.
fn push_operations(circuit: &mut CircuitData) {
    let operations = circuit.visible_selection.operations().to_vec();
    for operation in operations.into_iter().rev() {
        circuit.push_history(HistoryEntry::VisibleSelectionAddOperation { operation });
    }
}

fn push_initial_selection(circuit: &mut CircuitData) {
    let initial = circuit.visible_selection.initial_selection();
    let entry = if initial.is_empty() {
        HistoryEntry::VisibleSelectionClear
    } else {
        HistoryEntry::VisibleSelectionSet {
            selection: StableSelection::from_selection(initial, &circuit.keys),
        }
    };
    circuit.push_history(entry);
}

pub fn clear_visible_selection(circuit: &mut CircuitData) {
    set_visible_selection(circuit, Selection::new());
}

/// Ersetzt die Ausgangsselektion und verwirft alle Rechteck-Operationen.
pub fn set_visible_selection(circuit: &mut CircuitData, selection: Selection) {
    assert!(
        selection.is_valid(&circuit.layout),
        "Selektion enthält Elemente außerhalb des Layouts"
    );

    push_operations(circuit);
    if *circuit.visible_selection.initial_selection() != selection {
        push_initial_selection(circuit);
    }
    circuit.visible_selection.set_selection(selection);
}

pub fn add_visible_selection_rect(
    circuit: &mut CircuitData,
    function: SelectionFunction,
    rect: RectFine,
) {
    circuit.push_history(HistoryEntry::VisibleSelectionPopLast);
    circuit
        .visible_selection
        .add(VisibleSelectionOperation { function, rect });
}

/// Ersetzt das Rechteck der letzten Operation, etwa beim Aufziehen.
pub fn update_visible_selection_rect(circuit: &mut CircuitData, rect: RectFine) {
    let Some(last) = circuit.visible_selection.operations().last() else {
        panic!("keine Rechteck-Operation vorhanden");
    };
    let old_rect = last.rect;
    if old_rect == rect {
        return;
    }
    circuit.push_history(HistoryEntry::VisibleSelectionUpdateLast { rect: old_rect });
    circuit.visible_selection.update_last(rect);
}

pub fn pop_last_visible_selection_rect(circuit: &mut CircuitData) {
    let operation = circuit.visible_selection.pop_last();
    circuit.push_history(HistoryEntry::VisibleSelectionAddOperation { operation });
}

/// Übernimmt die ausgewertete Selektion als neue Ausgangsselektion.
pub fn apply_all_visible_selection_operations(circuit: &mut CircuitData) {
    if circuit.visible_selection.operations().is_empty() {
        return;
    }
    let selection = circuit
        .visible_selection
        .selection(&circuit.layout, &circuit.index);
    set_visible_selection(circuit, selection);
}
