//! Editieroperationen für Dekorationen.
//!
//! Gleicher Zustandsautomat wie bei Logikelementen, aber ohne Anschlüsse.

use crate::app::circuit_data::CircuitData;
use crate::app::history::HistoryEntry;
use crate::core::logicitem::to_insertion_mode;
use crate::core::{
    DecorationData, DecorationDefinition, DecorationId, DecorationKey, DisplayState, InfoMessage,
    InsertionMode, Point,
};

fn store_visible_selection_membership(circuit: &mut CircuitData, decoration_id: DecorationId) {
    if circuit
        .visible_selection
        .initial_selection()
        .is_selected_decoration(decoration_id)
    {
        let key = circuit.keys.decoration_key(decoration_id);
        circuit.push_history(HistoryEntry::DecorationAddVisibleSelection { key });
    }
}

// ── Erzeugen und Löschen ────────────────────────────────────────────

pub fn add_temporary_decoration(
    circuit: &mut CircuitData,
    definition: DecorationDefinition,
    position: Point,
    key: Option<DecorationKey>,
) -> DecorationId {
    let decoration_id =
        circuit
            .layout
            .add_decoration(definition, position, DisplayState::Temporary);
    circuit.submit(InfoMessage::DecorationCreated { decoration_id });

    if let Some(key) = key {
        circuit.keys.set_decoration_key(decoration_id, key);
    }
    let key = circuit.keys.decoration_key(decoration_id);
    circuit.push_history(HistoryEntry::DecorationDeleteTemporary { key });

    decoration_id
}

pub fn delete_temporary_decoration(circuit: &mut CircuitData, decoration_id: DecorationId) {
    let decoration = circuit.layout.decoration(decoration_id);
    assert_eq!(
        decoration.display_state,
        DisplayState::Temporary,
        "nur temporäre Dekorationen können gelöscht werden"
    );
    let definition = decoration.definition.clone();
    let position = decoration.position;

    store_visible_selection_membership(circuit, decoration_id);
    let key = circuit.keys.decoration_key(decoration_id);
    circuit.push_history(HistoryEntry::DecorationCreateTemporary {
        key,
        definition,
        position,
    });

    circuit.submit(InfoMessage::DecorationDeleted { decoration_id });
    let last_id = circuit.layout.swap_and_delete_decoration(decoration_id);
    if last_id == decoration_id {
        return;
    }

    circuit.submit(InfoMessage::DecorationIdUpdated {
        new_decoration_id: decoration_id,
        old_decoration_id: last_id,
    });
    let moved = circuit.layout.decoration(decoration_id);
    if moved.display_state.is_inserted() {
        let data = moved.data();
        circuit.submit(InfoMessage::InsertedDecorationIdUpdated {
            new_decoration_id: decoration_id,
            old_decoration_id: last_id,
            data,
        });
    }
}

// ── Verschieben ─────────────────────────────────────────────────────

pub fn is_decoration_position_representable(
    circuit: &CircuitData,
    decoration_id: DecorationId,
    dx: i32,
    dy: i32,
) -> bool {
    circuit
        .layout
        .decoration(decoration_id)
        .data()
        .is_representable_offset(dx, dy)
}

pub fn move_temporary_decoration_unchecked(
    circuit: &mut CircuitData,
    decoration_id: DecorationId,
    dx: i32,
    dy: i32,
) {
    let decoration = circuit.layout.decoration(decoration_id);
    assert_eq!(
        decoration.display_state,
        DisplayState::Temporary,
        "nur temporäre Dekorationen können verschoben werden"
    );
    let position = decoration.position.offset_unchecked(dx, dy);
    circuit.layout.set_decoration_position(decoration_id, position);

    let key = circuit.keys.decoration_key(decoration_id);
    circuit.push_history(HistoryEntry::DecorationMoveTemporary {
        key,
        dx: -dx,
        dy: -dy,
    });
}

/// Liefert `false`, wenn die Dekoration gelöscht wurde.
pub fn move_or_delete_temporary_decoration(
    circuit: &mut CircuitData,
    decoration_id: DecorationId,
    dx: i32,
    dy: i32,
) -> bool {
    if !is_decoration_position_representable(circuit, decoration_id, dx, dy) {
        delete_temporary_decoration(circuit, decoration_id);
        return false;
    }
    move_temporary_decoration_unchecked(circuit, decoration_id, dx, dy);
    true
}

// ── Einfügemodus ────────────────────────────────────────────────────

pub fn is_decoration_colliding(circuit: &CircuitData, decoration_id: DecorationId) -> bool {
    let data = circuit.layout.decoration(decoration_id).data();
    circuit
        .index
        .collision_index()
        .is_colliding_decoration(&data)
}

fn set_state(circuit: &mut CircuitData, decoration_id: DecorationId, state: DisplayState) {
    circuit
        .layout
        .set_decoration_display_state(decoration_id, state);
}

/// Liefert `None`, wenn die Dekoration beim Einfügen verworfen wurde.
pub fn change_decoration_insertion_mode(
    circuit: &mut CircuitData,
    decoration_id: DecorationId,
    new_mode: InsertionMode,
) -> Option<DecorationId> {
    let old_mode = to_insertion_mode(circuit.layout.decoration(decoration_id).display_state);
    if old_mode == new_mode {
        return Some(decoration_id);
    }

    let key = circuit.keys.decoration_key(decoration_id);
    circuit.push_history(HistoryEntry::DecorationToMode {
        key,
        mode: old_mode,
    });

    if old_mode == InsertionMode::Temporary {
        if is_decoration_colliding(circuit, decoration_id) {
            set_state(circuit, decoration_id, DisplayState::Colliding);
        } else {
            set_state(circuit, decoration_id, DisplayState::Valid);
            let data = circuit.layout.decoration(decoration_id).data();
            circuit.submit(InfoMessage::DecorationInserted {
                decoration_id,
                data,
            });
        }
    }

    if new_mode == InsertionMode::InsertOrDiscard {
        match circuit.layout.decoration(decoration_id).display_state {
            DisplayState::Valid => set_state(circuit, decoration_id, DisplayState::Normal),
            DisplayState::Colliding => {
                set_state(circuit, decoration_id, DisplayState::Temporary);
                delete_temporary_decoration(circuit, decoration_id);
                return None;
            }
            state => panic!("{decoration_id} hat unerwarteten Zustand {state:?}"),
        }
    }

    if old_mode == InsertionMode::InsertOrDiscard {
        set_state(circuit, decoration_id, DisplayState::Valid);
    }

    if new_mode == InsertionMode::Temporary {
        match circuit.layout.decoration(decoration_id).display_state {
            DisplayState::Valid => {
                let data = circuit.layout.decoration(decoration_id).data();
                circuit.submit(InfoMessage::DecorationUninserted {
                    decoration_id,
                    data,
                });
                set_state(circuit, decoration_id, DisplayState::Temporary);
            }
            DisplayState::Colliding => set_state(circuit, decoration_id, DisplayState::Temporary),
            state => panic!("{decoration_id} hat unerwarteten Zustand {state:?}"),
        }
    }

    Some(decoration_id)
}

pub fn add_decoration(
    circuit: &mut CircuitData,
    definition: DecorationDefinition,
    position: Point,
    mode: InsertionMode,
) -> Option<DecorationId> {
    if !DecorationData::is_representable(&definition, position) {
        log::debug!("Dekoration bei {position} nicht darstellbar");
        return None;
    }
    let decoration_id = add_temporary_decoration(circuit, definition, position, None);
    change_decoration_insertion_mode(circuit, decoration_id, mode)
}

// ── Text ────────────────────────────────────────────────────────────

/// Ersetzt den Text; die Geometrie bleibt unverändert.
pub fn set_decoration_text(circuit: &mut CircuitData, decoration_id: DecorationId, text: String) {
    let old_text = circuit.layout.decoration(decoration_id).definition.text.clone();
    if old_text == text {
        return;
    }
    circuit.layout.set_decoration_text(decoration_id, text);

    let key = circuit.keys.decoration_key(decoration_id);
    circuit.push_history(HistoryEntry::DecorationSetText {
        key,
        text: old_text,
    });
}

// ── Sichtbare Selektion ─────────────────────────────────────────────

pub fn add_decoration_to_visible_selection(circuit: &mut CircuitData, decoration_id: DecorationId) {
    let selected = circuit
        .visible_selection
        .initial_selection()
        .is_selected_decoration(decoration_id);
    if !selected {
        let key = circuit.keys.decoration_key(decoration_id);
        circuit.push_history(HistoryEntry::DecorationRemoveVisibleSelection { key });
    }
    circuit
        .visible_selection
        .initial_selection_mut()
        .add_decoration(decoration_id);
}

pub fn remove_decoration_from_visible_selection(
    circuit: &mut CircuitData,
    decoration_id: DecorationId,
) {
    store_visible_selection_membership(circuit, decoration_id);
    circuit
        .visible_selection
        .initial_selection_mut()
        .remove_decoration(decoration_id);
}
