//! Editieroperationen für Logikelemente.
//!
//! Logikelemente durchlaufen die Zustände `Temporary → Valid|Colliding → Normal`.
//! Beim Einfügen werden Leitungsausgänge an den Ausgängen des Elements zu
//! Leitungseingängen umgewandelt, beim Entfernen zurück.

use crate::app::circuit_data::CircuitData;
use crate::app::history::HistoryEntry;
use crate::core::geometry::orientations_compatible;
use crate::core::logicitem::to_insertion_mode;
use crate::core::{
    ConnectionKind, ConnectionRef, DisplayState, InfoMessage, InsertionMode, LogicItemData,
    LogicItemDefinition, LogicItemId, LogicItemKey, Point, Segment, SegmentPointType,
};

/// Leitungsendpunkt an einem Anschluss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireConnection {
    pub position: Point,
    pub segment: Segment,
}

// ── History ─────────────────────────────────────────────────────────

fn store_visible_selection_membership(circuit: &mut CircuitData, logicitem_id: LogicItemId) {
    if circuit
        .visible_selection
        .initial_selection()
        .is_selected_logicitem(logicitem_id)
    {
        let key = circuit.keys.logicitem_key(logicitem_id);
        circuit.push_history(HistoryEntry::LogicItemAddVisibleSelection { key });
    }
}

// ── Erzeugen und Löschen ────────────────────────────────────────────

/// Legt ein temporäres Element an, optional mit vorgegebenem Schlüssel.
pub fn add_temporary_logicitem(
    circuit: &mut CircuitData,
    definition: LogicItemDefinition,
    position: Point,
    key: Option<LogicItemKey>,
) -> LogicItemId {
    let logicitem_id =
        circuit
            .layout
            .add_logicitem(definition, position, DisplayState::Temporary);
    circuit.submit(InfoMessage::LogicItemCreated { logicitem_id });

    if let Some(key) = key {
        circuit.keys.set_logicitem_key(logicitem_id, key);
    }
    let key = circuit.keys.logicitem_key(logicitem_id);
    circuit.push_history(HistoryEntry::LogicItemDeleteTemporary { key });

    logicitem_id
}

fn notify_logicitem_id_change(
    circuit: &mut CircuitData,
    new_logicitem_id: LogicItemId,
    old_logicitem_id: LogicItemId,
) {
    circuit.submit(InfoMessage::LogicItemIdUpdated {
        new_logicitem_id,
        old_logicitem_id,
    });

    let logicitem = circuit.layout.logicitem(new_logicitem_id);
    if logicitem.display_state.is_inserted() {
        let data = logicitem.data();
        circuit.submit(InfoMessage::InsertedLogicItemIdUpdated {
            new_logicitem_id,
            old_logicitem_id,
            data,
        });
    }
}

/// Löscht ein temporäres Element; das letzte Element übernimmt seine Id.
pub fn delete_temporary_logicitem(circuit: &mut CircuitData, logicitem_id: LogicItemId) {
    let logicitem = circuit.layout.logicitem(logicitem_id);
    assert_eq!(
        logicitem.display_state,
        DisplayState::Temporary,
        "nur temporäre Logikelemente können gelöscht werden"
    );
    let definition = logicitem.definition.clone();
    let position = logicitem.position;

    store_visible_selection_membership(circuit, logicitem_id);
    let key = circuit.keys.logicitem_key(logicitem_id);
    circuit.push_history(HistoryEntry::LogicItemCreateTemporary {
        key,
        definition,
        position,
    });

    circuit.submit(InfoMessage::LogicItemDeleted { logicitem_id });
    let last_id = circuit.layout.swap_and_delete_logicitem(logicitem_id);
    if last_id != logicitem_id {
        notify_logicitem_id_change(circuit, logicitem_id, last_id);
    }
}

// ── Verschieben ─────────────────────────────────────────────────────

pub fn is_logicitem_position_representable(
    circuit: &CircuitData,
    logicitem_id: LogicItemId,
    dx: i32,
    dy: i32,
) -> bool {
    circuit
        .layout
        .logicitem(logicitem_id)
        .data()
        .is_representable_offset(dx, dy)
}

/// Verschiebt ohne Darstellbarkeitsprüfung.
pub fn move_temporary_logicitem_unchecked(
    circuit: &mut CircuitData,
    logicitem_id: LogicItemId,
    dx: i32,
    dy: i32,
) {
    let logicitem = circuit.layout.logicitem(logicitem_id);
    assert_eq!(
        logicitem.display_state,
        DisplayState::Temporary,
        "nur temporäre Logikelemente können verschoben werden"
    );
    debug_assert!(logicitem.data().is_representable_offset(dx, dy));

    let position = logicitem.position.offset_unchecked(dx, dy);
    circuit.layout.set_logicitem_position(logicitem_id, position);

    let key = circuit.keys.logicitem_key(logicitem_id);
    circuit.push_history(HistoryEntry::LogicItemMoveTemporary {
        key,
        dx: -dx,
        dy: -dy,
    });
}

/// Verschiebt das Element oder löscht es, wenn die Zielposition nicht darstellbar ist.
///
/// Liefert `false`, wenn das Element gelöscht wurde.
pub fn move_or_delete_temporary_logicitem(
    circuit: &mut CircuitData,
    logicitem_id: LogicItemId,
    dx: i32,
    dy: i32,
) -> bool {
    if !is_logicitem_position_representable(circuit, logicitem_id, dx, dy) {
        log::debug!("{logicitem_id} nicht darstellbar nach ({dx}, {dy}), wird gelöscht");
        delete_temporary_logicitem(circuit, logicitem_id);
        return false;
    }
    move_temporary_logicitem_unchecked(circuit, logicitem_id, dx, dy);
    true
}

// ── Kollisionen und Anschlussumwandlung ─────────────────────────────

/// Leitungsausgänge an den Ausgängen des Elements, die zu Eingängen werden müssen.
///
/// `None`, wenn eine Umwandlung nicht möglich ist: unpassende Orientierung,
/// mehrere Kandidaten derselben Leitung oder eine bereits getriebene Leitung.
pub fn find_convertible_wire_inputs(
    circuit: &CircuitData,
    data: &LogicItemData,
) -> Option<Vec<WireConnection>> {
    let mut candidates = Vec::new();

    for output in data.outputs() {
        if let Some(entry) = circuit.index.wire_outputs().find(output.position) {
            if !orientations_compatible(output.orientation, entry.orientation) {
                return None;
            }
            candidates.push(WireConnection {
                position: output.position,
                segment: entry.segment,
            });
        }
    }

    let mut wire_ids: Vec<_> = candidates
        .iter()
        .map(|candidate| candidate.segment.wire_id)
        .collect();
    wire_ids.sort();
    let count = wire_ids.len();
    wire_ids.dedup();
    if wire_ids.len() != count {
        return None;
    }

    if wire_ids
        .iter()
        .any(|wire_id| circuit.layout.segment_tree(*wire_id).has_input())
    {
        return None;
    }

    Some(candidates)
}

fn any_inputs_colliding(circuit: &CircuitData, data: &LogicItemData) -> bool {
    data.inputs().into_iter().any(|input| {
        circuit
            .index
            .wire_outputs()
            .find(input.position)
            .is_some_and(|entry| !orientations_compatible(input.orientation, entry.orientation))
    })
}

pub fn is_logicitem_colliding(circuit: &CircuitData, logicitem_id: LogicItemId) -> bool {
    let data = circuit.layout.logicitem(logicitem_id).data();

    circuit.index.collision_index().is_colliding_logicitem(&data)
        || any_inputs_colliding(circuit, &data)
        || find_convertible_wire_inputs(circuit, &data).is_none()
}

fn convert_endpoint(
    circuit: &mut CircuitData,
    connection: WireConnection,
    from: SegmentPointType,
    to: SegmentPointType,
) {
    let segment = connection.segment;
    assert!(
        segment.wire_id.is_inserted(),
        "nur eingefügte Leitungen können umgewandelt werden"
    );

    let old_info = circuit.layout.segment_info(segment);
    let mut new_info = old_info;
    if old_info.line.p0 == connection.position {
        assert_eq!(old_info.p0_type, from, "unerwarteter Endpunkttyp bei {segment}");
        new_info.p0_type = to;
    } else if old_info.line.p1 == connection.position {
        assert_eq!(old_info.p1_type, from, "unerwarteter Endpunkttyp bei {segment}");
        new_info.p1_type = to;
    } else {
        panic!("{} ist kein Endpunkt von {segment}", connection.position);
    }

    circuit
        .layout
        .segment_tree_mut(segment.wire_id)
        .update_segment(segment.segment_index, new_info);
    circuit.submit(InfoMessage::InsertedEndPointsUpdated {
        segment,
        new_info,
        old_info,
    });
}

fn convert_wires_at_outputs_to_inputs(circuit: &mut CircuitData, logicitem_id: LogicItemId) {
    let data = circuit.layout.logicitem(logicitem_id).data();
    let Some(connections) = find_convertible_wire_inputs(circuit, &data) else {
        panic!("{logicitem_id} kollidiert beim Einfügen");
    };

    for connection in connections {
        convert_endpoint(
            circuit,
            connection,
            SegmentPointType::Output,
            SegmentPointType::Input,
        );
    }
}

fn convert_wires_at_outputs_to_outputs(circuit: &mut CircuitData, logicitem_id: LogicItemId) {
    let data = circuit.layout.logicitem(logicitem_id).data();

    for output in data.outputs() {
        if let Some(entry) = circuit.index.wire_inputs().find(output.position) {
            let connection = WireConnection {
                position: output.position,
                segment: entry.segment,
            };
            convert_endpoint(
                circuit,
                connection,
                SegmentPointType::Input,
                SegmentPointType::Output,
            );
        }
    }
}

// ── Einfügemodus ────────────────────────────────────────────────────

fn temporary_to_colliding(circuit: &mut CircuitData, logicitem_id: LogicItemId) {
    assert_eq!(
        circuit.layout.logicitem(logicitem_id).display_state,
        DisplayState::Temporary,
        "{logicitem_id} ist nicht temporär"
    );

    if is_logicitem_colliding(circuit, logicitem_id) {
        circuit
            .layout
            .set_logicitem_display_state(logicitem_id, DisplayState::Colliding);
        return;
    }

    convert_wires_at_outputs_to_inputs(circuit, logicitem_id);
    circuit
        .layout
        .set_logicitem_display_state(logicitem_id, DisplayState::Valid);
    let data = circuit.layout.logicitem(logicitem_id).data();
    circuit.submit(InfoMessage::LogicItemInserted { logicitem_id, data });
}

/// `None`, wenn das kollidierende Element verworfen wurde.
fn colliding_to_insert(
    circuit: &mut CircuitData,
    logicitem_id: LogicItemId,
) -> Option<LogicItemId> {
    match circuit.layout.logicitem(logicitem_id).display_state {
        DisplayState::Valid => {
            circuit
                .layout
                .set_logicitem_display_state(logicitem_id, DisplayState::Normal);
            Some(logicitem_id)
        }
        DisplayState::Colliding => {
            circuit
                .layout
                .set_logicitem_display_state(logicitem_id, DisplayState::Temporary);
            delete_temporary_logicitem(circuit, logicitem_id);
            None
        }
        state => panic!("{logicitem_id} hat unerwarteten Zustand {state:?}"),
    }
}

fn insert_to_colliding(circuit: &mut CircuitData, logicitem_id: LogicItemId) {
    assert_eq!(
        circuit.layout.logicitem(logicitem_id).display_state,
        DisplayState::Normal,
        "{logicitem_id} ist nicht eingefügt"
    );
    circuit
        .layout
        .set_logicitem_display_state(logicitem_id, DisplayState::Valid);
}

fn colliding_to_temporary(circuit: &mut CircuitData, logicitem_id: LogicItemId) {
    match circuit.layout.logicitem(logicitem_id).display_state {
        DisplayState::Valid => {
            let data = circuit.layout.logicitem(logicitem_id).data();
            circuit.submit(InfoMessage::LogicItemUninserted { logicitem_id, data });
            circuit
                .layout
                .set_logicitem_display_state(logicitem_id, DisplayState::Temporary);
            convert_wires_at_outputs_to_outputs(circuit, logicitem_id);
        }
        DisplayState::Colliding => {
            circuit
                .layout
                .set_logicitem_display_state(logicitem_id, DisplayState::Temporary);
        }
        state => panic!("{logicitem_id} hat unerwarteten Zustand {state:?}"),
    }
}

/// Überführt ein Element in den angeforderten Einfügemodus.
///
/// Liefert `None`, wenn das Element beim Einfügen verworfen wurde.
pub fn change_logicitem_insertion_mode(
    circuit: &mut CircuitData,
    logicitem_id: LogicItemId,
    new_mode: InsertionMode,
) -> Option<LogicItemId> {
    let old_mode = to_insertion_mode(circuit.layout.logicitem(logicitem_id).display_state);
    if old_mode == new_mode {
        return Some(logicitem_id);
    }

    let key = circuit.keys.logicitem_key(logicitem_id);
    circuit.push_history(HistoryEntry::LogicItemToMode {
        key,
        mode: old_mode,
    });

    if old_mode == InsertionMode::Temporary {
        temporary_to_colliding(circuit, logicitem_id);
    }
    if new_mode == InsertionMode::InsertOrDiscard {
        colliding_to_insert(circuit, logicitem_id)?;
    }
    if old_mode == InsertionMode::InsertOrDiscard {
        insert_to_colliding(circuit, logicitem_id);
    }
    if new_mode == InsertionMode::Temporary {
        colliding_to_temporary(circuit, logicitem_id);
    }
    Some(logicitem_id)
}

/// Fügt ein Element direkt an der Zielposition ein.
///
/// `None`, wenn die Position nicht darstellbar ist oder das Element verworfen wurde.
pub fn add_logicitem(
    circuit: &mut CircuitData,
    definition: LogicItemDefinition,
    position: Point,
    mode: InsertionMode,
) -> Option<LogicItemId> {
    if !LogicItemData::is_representable(&definition, position) {
        log::debug!("Logikelement bei {position} nicht darstellbar");
        return None;
    }
    let logicitem_id = add_temporary_logicitem(circuit, definition, position, None);
    change_logicitem_insertion_mode(circuit, logicitem_id, mode)
}

// ── Inverter ────────────────────────────────────────────────────────

/// Schaltet den Inverter eines Anschlusses um.
pub fn toggle_logicitem_inverter(
    circuit: &mut CircuitData,
    logicitem_id: LogicItemId,
    connection: ConnectionRef,
) {
    circuit.layout.toggle_inverter(logicitem_id, connection);

    let key = circuit.keys.logicitem_key(logicitem_id);
    circuit.push_history(HistoryEntry::LogicItemToggleInverter { key, connection });
}

/// Schaltet den Inverter des eingefügten Anschlusses an `point` um, falls er gerichtet ist.
pub fn toggle_inverter(circuit: &mut CircuitData, point: Point) {
    if let Some(entry) = circuit.index.logicitem_inputs().find(point) {
        if entry.orientation.is_directed() {
            toggle_logicitem_inverter(
                circuit,
                entry.logicitem_id,
                ConnectionRef {
                    kind: ConnectionKind::Input,
                    connection_id: entry.connection_id,
                },
            );
        }
    }

    if let Some(entry) = circuit.index.logicitem_outputs().find(point) {
        if entry.orientation.is_directed() {
            toggle_logicitem_inverter(
                circuit,
                entry.logicitem_id,
                ConnectionRef {
                    kind: ConnectionKind::Output,
                    connection_id: entry.connection_id,
                },
            );
        }
    }
}

// ── Sichtbare Selektion ─────────────────────────────────────────────

pub fn add_logicitem_to_visible_selection(circuit: &mut CircuitData, logicitem_id: LogicItemId) {
    let selected = circuit
        .visible_selection
        .initial_selection()
        .is_selected_logicitem(logicitem_id);
    if !selected {
        let key = circuit.keys.logicitem_key(logicitem_id);
        circuit.push_history(HistoryEntry::LogicItemRemoveVisibleSelection { key });
    }
    circuit
        .visible_selection
        .initial_selection_mut()
        .add_logicitem(logicitem_id);
}

pub fn remove_logicitem_from_visible_selection(
    circuit: &mut CircuitData,
    logicitem_id: LogicItemId,
) {
    store_visible_selection_membership(circuit, logicitem_id);
    circuit
        .visible_selection
        .initial_selection_mut()
        .remove_logicitem(logicitem_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Orientation, LogicItemType};

    fn buffer() -> LogicItemDefinition {
        LogicItemDefinition::new(LogicItemType::BufferElement, 1, Orientation::Right)
    }

    #[test]
    fn insert_and_remove_updates_index() {
        let mut circuit = CircuitData::new();
        let logicitem_id = add_logicitem(
            &mut circuit,
            buffer(),
            Point::new(0, 0),
            InsertionMode::InsertOrDiscard,
        )
        .expect("Element erwartet");

        assert_eq!(
            circuit.layout.logicitem(logicitem_id).display_state,
            DisplayState::Normal
        );
        assert_eq!(circuit.index.logicitem_outputs().len(), 1);

        change_logicitem_insertion_mode(&mut circuit, logicitem_id, InsertionMode::Temporary);
        assert!(circuit.index.logicitem_outputs().is_empty());
        assert!(circuit.index.collision_index().is_empty());
    }

    #[test]
    fn colliding_item_is_discarded() {
        let mut circuit = CircuitData::new();
        add_logicitem(
            &mut circuit,
            buffer(),
            Point::new(0, 0),
            InsertionMode::InsertOrDiscard,
        )
        .expect("Element erwartet");

        let second = add_logicitem(
            &mut circuit,
            buffer(),
            Point::new(0, 0),
            InsertionMode::InsertOrDiscard,
        );
        assert_eq!(second, None);
        assert_eq!(circuit.layout.logicitem_count(), 1);
    }

    #[test]
    fn unrepresentable_move_deletes() {
        let mut circuit = CircuitData::new();
        let logicitem_id = add_logicitem(
            &mut circuit,
            buffer(),
            Point::new(0, 0),
            InsertionMode::Temporary,
        )
        .expect("Element erwartet");

        assert!(move_or_delete_temporary_logicitem(
            &mut circuit,
            logicitem_id,
            10,
            -4
        ));
        assert_eq!(circuit.layout.logicitem(logicitem_id).position, Point::new(10, -4));

        assert!(!move_or_delete_temporary_logicitem(
            &mut circuit,
            logicitem_id,
            i32::from(i16::MAX),
            0
        ));
        assert_eq!(circuit.layout.logicitem_count(), 0);
    }
}
