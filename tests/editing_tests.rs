//! Integrationstests für die Editieroperationen des Modifiers:
//! - temporäre Leitungen löschen und verschieben (inkl. Überlauf)
//! - Anschlussumwandlung beim Einfügen von Logikelementen (alles oder nichts)
//! - Teilbereiche eingefügter Leitungen löschen

use editable_circuit::app::mouse_tool::to_grid_point;
use editable_circuit::core::geometry::Orientation;
use editable_circuit::{
    DecorationDefinition, DisplayState, InsertionMode, LogicItemDefinition, LogicItemType,
    Modifier, ModifierConfig, OrderedLine, Part, Point, SegmentPart, SegmentPointType, Selection,
};
use glam::Vec2;

fn validating_modifier() -> Modifier {
    Modifier::new(ModifierConfig {
        validate_messages: true,
        ..ModifierConfig::default()
    })
}

fn line(x0: i16, y0: i16, x1: i16, y1: i16) -> OrderedLine {
    OrderedLine::from_points(Point::new(x0, y0), Point::new(x1, y1))
}

fn buffer(orientation: Orientation) -> LogicItemDefinition {
    LogicItemDefinition::new(LogicItemType::BufferElement, 1, orientation)
}

fn all_lines(modifier: &Modifier) -> Vec<OrderedLine> {
    let mut lines: Vec<OrderedLine> = modifier
        .layout()
        .segments()
        .map(|segment| modifier.layout().line(segment))
        .collect();
    lines.sort();
    lines
}

// ── Temporäre Leitungen ─────────────────────────────────────────────

#[test]
fn test_delete_temporary_wire_and_undo_redo() {
    let mut modifier = validating_modifier();
    let segment_part = modifier
        .add_wire_segment(line(0, 0, 10, 0), InsertionMode::Temporary)
        .expect("temporäres Segment erwartet");
    assert_eq!(segment_part.part, Part::new(0, 10));

    let before = modifier.layout_key_state();
    modifier.delete_temporary_wire_segment(segment_part);
    assert_eq!(modifier.layout().segment_count(), 0);

    assert!(modifier.undo_group());
    assert_eq!(modifier.layout().segment_count(), 1);
    assert_eq!(modifier.layout_key_state(), before);

    assert!(modifier.redo_group());
    assert_eq!(modifier.layout().segment_count(), 0);
}

#[test]
fn test_move_temporary_wire_and_overflow_deletes() {
    let mut modifier = validating_modifier();
    let segment_part = modifier
        .add_wire_segment(line(0, 0, 10, 0), InsertionMode::Temporary)
        .expect("temporäres Segment erwartet");

    let moved = modifier
        .move_or_delete_temporary_wire(segment_part, 10, 10)
        .expect("darstellbare Verschiebung erwartet");
    assert_eq!(modifier.layout().line(moved.segment), line(10, 10, 20, 10));

    let result = modifier.move_or_delete_temporary_wire(moved, i32::from(i16::MAX), 0);
    assert!(result.is_none());
    assert_eq!(modifier.layout().segment_count(), 0);
}

#[test]
fn test_extreme_deltas_delete_instead_of_overflowing() {
    let mut modifier = validating_modifier();
    let segment_part = modifier
        .add_wire_segment(line(0, 0, 10, 0), InsertionMode::Temporary)
        .expect("temporäres Segment erwartet");
    let moved = modifier
        .move_or_delete_temporary_wire(segment_part, 5, 0)
        .expect("darstellbare Verschiebung erwartet");
    assert!(!modifier.is_wire_position_representable(moved, i32::MIN, 0));
    assert!(modifier
        .move_or_delete_temporary_wire(moved, i32::MAX, 0)
        .is_none());
    assert_eq!(modifier.layout().segment_count(), 0);

    let logicitem_id = modifier
        .add_logicitem(buffer(Orientation::Right), Point::new(3, 3), InsertionMode::Temporary)
        .expect("Element erwartet");
    assert!(!modifier.is_logicitem_position_representable(logicitem_id, 0, i32::MAX));
    assert!(!modifier.move_or_delete_temporary_logicitem(logicitem_id, i32::MIN, 0));
    assert_eq!(modifier.layout().logicitem_count(), 0);

    let decoration_id = modifier
        .add_decoration(
            DecorationDefinition::text_element("Takt", 3, 1),
            Point::new(3, 3),
            InsertionMode::Temporary,
        )
        .expect("Dekoration erwartet");
    assert!(!modifier.move_or_delete_temporary_decoration(decoration_id, 0, i32::MIN));
    assert_eq!(modifier.layout().decoration_count(), 0);
}

#[test]
fn test_move_round_trip_restores_geometry() {
    let mut modifier = validating_modifier();
    let segment_part = modifier
        .add_wire_segment(line(2, 3, 2, 9), InsertionMode::Temporary)
        .expect("temporäres Segment erwartet");
    let logicitem_id = modifier
        .add_logicitem(buffer(Orientation::Right), Point::new(20, 20), InsertionMode::Temporary)
        .expect("Element erwartet");
    let before = modifier.layout_key_state();

    let mut selection = Selection::new();
    selection.add_segment(segment_part);
    selection.add_logicitem(logicitem_id);
    assert!(modifier.new_positions_representable(&selection, 7, -4));
    modifier.move_temporary_unchecked(&selection, 7, -4);
    assert_ne!(modifier.layout_key_state(), before);
    modifier.move_temporary_unchecked(&selection, -7, 4);

    assert_eq!(modifier.layout_key_state(), before);
}

#[test]
fn test_partial_move_splits_temporary_segment() {
    let mut modifier = validating_modifier();
    let segment_part = modifier
        .add_wire_segment(line(0, 0, 10, 0), InsertionMode::Temporary)
        .expect("temporäres Segment erwartet");

    modifier.move_or_delete_temporary_wire(
        SegmentPart {
            segment: segment_part.segment,
            part: Part::new(4, 10),
        },
        0,
        2,
    );

    assert_eq!(all_lines(&modifier), vec![line(0, 0, 4, 0), line(4, 2, 10, 2)]);
}

// ── Einfügemodi ─────────────────────────────────────────────────────

#[test]
fn test_requesting_current_mode_is_idempotent() {
    let mut modifier = validating_modifier();
    let segment_part = modifier
        .add_wire_segment(line(0, 0, 6, 0), InsertionMode::InsertOrDiscard)
        .expect("Segment erwartet");
    let logicitem_id = modifier
        .add_logicitem(buffer(Orientation::Right), Point::new(10, 10), InsertionMode::InsertOrDiscard)
        .expect("Element erwartet");
    let before = modifier.layout_key_state();

    let same = modifier.change_wire_insertion_mode(segment_part, InsertionMode::InsertOrDiscard);
    assert_eq!(same, Some(segment_part));
    let same = modifier.change_logicitem_insertion_mode(logicitem_id, InsertionMode::InsertOrDiscard);
    assert_eq!(same, Some(logicitem_id));

    assert_eq!(modifier.layout_key_state(), before);
}

#[test]
fn test_display_states_follow_insertion_modes() {
    let mut modifier = validating_modifier();
    let temporary = modifier
        .add_logicitem(buffer(Orientation::Right), Point::new(0, 0), InsertionMode::Temporary)
        .expect("Element erwartet");
    assert_eq!(
        modifier.layout().logicitem(temporary).display_state,
        DisplayState::Temporary
    );

    let valid = modifier
        .change_logicitem_insertion_mode(temporary, InsertionMode::Collisions)
        .expect("Element erwartet");
    assert_eq!(modifier.layout().logicitem(valid).display_state, DisplayState::Valid);

    // zweites Element an derselben Stelle kollidiert und wird verworfen
    let colliding = modifier
        .add_logicitem(buffer(Orientation::Right), Point::new(0, 0), InsertionMode::Collisions)
        .expect("Element erwartet");
    assert_eq!(
        modifier.layout().logicitem(colliding).display_state,
        DisplayState::Colliding
    );
    let discarded = modifier.change_logicitem_insertion_mode(colliding, InsertionMode::InsertOrDiscard);
    assert!(discarded.is_none());

    let normal = modifier
        .change_logicitem_insertion_mode(valid, InsertionMode::InsertOrDiscard)
        .expect("Element erwartet");
    assert_eq!(modifier.layout().logicitem(normal).display_state, DisplayState::Normal);
    assert_eq!(modifier.layout().logicitem_count(), 1);
}

// ── Anschlussumwandlung ─────────────────────────────────────────────

#[test]
fn test_logicitem_output_converts_wire_endpoint() {
    let mut modifier = validating_modifier();
    modifier
        .add_wire_segment(line(1, 0, 5, 0), InsertionMode::InsertOrDiscard)
        .expect("Segment erwartet");
    assert!(modifier.index().wire_outputs().find(Point::new(1, 0)).is_some());

    // Ausgang des Puffers liegt bei (1, 0) mit Orientierung rechts
    let logicitem_id = modifier
        .add_logicitem(buffer(Orientation::Right), Point::new(0, 0), InsertionMode::Collisions)
        .expect("Element erwartet");

    assert_eq!(
        modifier.layout().logicitem(logicitem_id).display_state,
        DisplayState::Valid
    );
    let entry = modifier
        .index()
        .wire_inputs()
        .find(Point::new(1, 0))
        .expect("Leitungseingang erwartet");
    let info = modifier.layout().segment_info(entry.segment);
    assert_eq!(info.p0_type, SegmentPointType::Input);

    // Zurückstufen stellt den Ausgang wieder her
    modifier.change_logicitem_insertion_mode(logicitem_id, InsertionMode::Temporary);
    assert!(modifier.index().wire_inputs().find(Point::new(1, 0)).is_none());
    assert!(modifier.index().wire_outputs().find(Point::new(1, 0)).is_some());
}

#[test]
fn test_two_outputs_on_same_wire_convert_nothing() {
    let mut modifier = validating_modifier();
    for segment in [line(3, 0, 5, 0), line(5, 0, 5, 1), line(3, 1, 5, 1)] {
        modifier
            .add_wire_segment(segment, InsertionMode::InsertOrDiscard)
            .expect("Segment erwartet");
    }
    assert_eq!(modifier.layout().inserted_wire_ids().count(), 1);

    // Latch-Ausgänge bei (3, 0) und (3, 1) treffen dieselbe Leitung
    let latch = LogicItemDefinition::new(LogicItemType::Latch, 2, Orientation::Right);
    let logicitem_id = modifier
        .add_logicitem(latch, Point::new(0, 0), InsertionMode::Collisions)
        .expect("Element erwartet");

    assert_eq!(
        modifier.layout().logicitem(logicitem_id).display_state,
        DisplayState::Colliding
    );
    for point in [Point::new(3, 0), Point::new(3, 1)] {
        assert!(modifier.index().wire_inputs().find(point).is_none());
        assert!(modifier.index().wire_outputs().find(point).is_some());
    }
}

#[test]
fn test_driven_wire_is_not_converted_again() {
    let mut modifier = validating_modifier();
    modifier
        .add_wire_segment(line(1, 0, 5, 0), InsertionMode::InsertOrDiscard)
        .expect("Segment erwartet");
    // treibt die Leitung von rechts
    modifier
        .add_logicitem(buffer(Orientation::Left), Point::new(5, 0), InsertionMode::InsertOrDiscard)
        .expect("Element erwartet");
    assert!(modifier.index().wire_inputs().find(Point::new(5, 0)).is_some());

    let logicitem_id = modifier
        .add_logicitem(buffer(Orientation::Right), Point::new(0, 0), InsertionMode::Collisions)
        .expect("Element erwartet");
    assert_eq!(
        modifier.layout().logicitem(logicitem_id).display_state,
        DisplayState::Colliding
    );
    assert!(modifier.index().wire_inputs().find(Point::new(1, 0)).is_none());
}

// ── Teilbereiche eingefügter Leitungen ──────────────────────────────

#[test]
fn test_delete_middle_part_and_undo() {
    let mut modifier = validating_modifier();
    let segment_part = modifier
        .add_wire_segment(line(0, 0, 10, 0), InsertionMode::InsertOrDiscard)
        .expect("Segment erwartet");
    let before = modifier.layout_key_state();

    let mut selection = Selection::new();
    selection.add_segment(SegmentPart {
        segment: segment_part.segment,
        part: Part::new(3, 6),
    });
    modifier.delete_all(selection);

    assert_eq!(modifier.layout().segment_count(), 2);
    assert_eq!(all_lines(&modifier), vec![line(0, 0, 3, 0), line(6, 0, 10, 0)]);
    assert_eq!(modifier.layout().inserted_wire_ids().count(), 2);

    assert!(modifier.undo_group());
    assert_eq!(modifier.layout().segment_count(), 1);
    assert_eq!(all_lines(&modifier), vec![line(0, 0, 10, 0)]);
    assert_eq!(modifier.layout_key_state(), before);
}

#[test]
fn test_collinear_wire_extends_existing_segment() {
    let mut modifier = validating_modifier();
    modifier
        .add_wire_segment(line(0, 0, 5, 0), InsertionMode::InsertOrDiscard)
        .expect("Segment erwartet");
    modifier
        .add_wire_segment(line(5, 0, 9, 0), InsertionMode::InsertOrDiscard)
        .expect("Segment erwartet");

    assert_eq!(all_lines(&modifier), vec![line(0, 0, 9, 0)]);
}

// ── Umschalter ──────────────────────────────────────────────────────

#[test]
fn test_toggle_inverter_is_symmetric() {
    let mut modifier = validating_modifier();
    let definition = LogicItemDefinition::new(LogicItemType::AndElement, 2, Orientation::Right);
    let logicitem_id = modifier
        .add_logicitem(definition, Point::new(0, 0), InsertionMode::InsertOrDiscard)
        .expect("Element erwartet");

    modifier.toggle_inverter(Point::new(0, 1));
    assert_eq!(
        modifier.layout().logicitem(logicitem_id).definition.input_inverters,
        vec![false, true]
    );
    modifier.toggle_inverter(Point::new(0, 1));
    assert_eq!(
        modifier.layout().logicitem(logicitem_id).definition.input_inverters,
        vec![false, false]
    );

    // kein Anschluss an diesem Punkt
    let before = modifier.layout_key_state();
    modifier.toggle_inverter(Point::new(30, 30));
    assert_eq!(modifier.layout_key_state(), before);
}

#[test]
fn test_toggle_crosspoint_twice_restores_layout() {
    let mut modifier = validating_modifier();
    modifier
        .add_wire_segment(line(0, 5, 10, 5), InsertionMode::InsertOrDiscard)
        .expect("Segment erwartet");
    modifier
        .add_wire_segment(line(5, 0, 5, 10), InsertionMode::InsertOrDiscard)
        .expect("Segment erwartet");
    let crossing = modifier.layout_key_state();
    assert_eq!(modifier.layout().inserted_wire_ids().count(), 2);

    modifier.toggle_wire_crosspoint(Point::new(5, 5));
    assert_eq!(modifier.layout().inserted_wire_ids().count(), 1);
    assert_eq!(modifier.layout().segment_count(), 4);

    modifier.toggle_wire_crosspoint(Point::new(5, 5));
    assert_eq!(modifier.layout().inserted_wire_ids().count(), 2);
    assert_eq!(all_lines(&modifier), vec![line(0, 5, 10, 5), line(5, 0, 5, 10)]);

    modifier.undo_group();
    modifier.undo_group();
    assert_eq!(modifier.layout_key_state(), crossing);
}

// ── Selektionen ─────────────────────────────────────────────────────

#[test]
fn test_tracked_selection_survives_edits() {
    let mut modifier = validating_modifier();
    let first = modifier
        .add_logicitem(buffer(Orientation::Right), Point::new(0, 0), InsertionMode::Temporary)
        .expect("Element erwartet");
    let second = modifier
        .add_logicitem(buffer(Orientation::Right), Point::new(0, 5), InsertionMode::Temporary)
        .expect("Element erwartet");

    let mut selection = Selection::new();
    selection.add_logicitem(second);
    let selection_id = modifier.create_selection(selection);

    // Löschen des ersten verschiebt die Id des zweiten
    modifier.delete_temporary_logicitem(first);
    let tracked: Vec<_> = modifier.selection(selection_id).selected_logicitems().collect();
    assert_eq!(tracked.len(), 1);
    assert_eq!(modifier.layout().logicitem(tracked[0]).position, Point::new(0, 5));

    modifier.delete_temporary_logicitem(tracked[0]);
    assert!(modifier.selection(selection_id).is_empty());
    modifier.destroy_selection(selection_id);
}

#[test]
fn test_query_selection_returns_hit_parts() {
    let mut modifier = validating_modifier();
    modifier
        .add_wire_segment(line(0, 0, 10, 0), InsertionMode::InsertOrDiscard)
        .expect("Segment erwartet");
    let rect = editable_circuit::RectFine::new(Vec2::new(2.0, -1.0), Vec2::new(5.0, 1.0));

    let selection = modifier.query_selection(rect);
    let parts = selection.selected_segment_parts();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].part, Part::new(2, 5));
    assert_eq!(to_grid_point(Vec2::new(2.4, -0.6)), Some(Point::new(2, -1)));
}
