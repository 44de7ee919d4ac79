//! Undo/Redo-Gesetze: für Zustand `S` und Gruppe `E` gilt
//! `undo(apply(E, S)) == S` und `redo(undo(apply(E, S))) == apply(E, S)`,
//! verglichen über die reihenfolgeunabhängigen Schlüsselzustände.

use editable_circuit::app::mouse_tool::{InsertWireTool, SelectAreaTool, SelectMoveTool};
use editable_circuit::core::geometry::Orientation;
use editable_circuit::{
    DecorationDefinition, InsertionMode, LineInsertionType, LogicItemDefinition, LogicItemType,
    Modifier, ModifierConfig, MouseTool, OrderedLine, Part, Point, SegmentPart,
    SelectionFunction, Selection,
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

/// Baut eine kleine Ausgangsschaltung als eigene Gruppe.
fn base_circuit(modifier: &mut Modifier) {
    modifier.begin_undo_group();
    modifier.add_wire_segments(
        Point::new(0, 0),
        Point::new(8, 6),
        LineInsertionType::HorizontalFirst,
        InsertionMode::InsertOrDiscard,
    );
    modifier.add_wire_segment(line(4, 0, 4, 10), InsertionMode::InsertOrDiscard);
    modifier.add_logicitem(
        LogicItemDefinition::new(LogicItemType::AndElement, 2, Orientation::Right),
        Point::new(20, 0),
        InsertionMode::InsertOrDiscard,
    );
    modifier.add_decoration(
        DecorationDefinition::text_element("Takt", 3, 1),
        Point::new(20, 10),
        InsertionMode::InsertOrDiscard,
    );
    modifier.finish_undo_group();
}

/// Prüft beide Gesetze für die Gruppe `edit`.
fn check_laws(edit: impl FnOnce(&mut Modifier)) {
    let mut modifier = validating_modifier();
    base_circuit(&mut modifier);
    let groups = modifier.undo_groups_count();
    let before = modifier.layout_key_state();

    modifier.begin_undo_group();
    edit(&mut modifier);
    modifier.finish_undo_group();
    let after = modifier.layout_key_state();
    // Werkzeug-Gesten schließen eigene Gruppen
    let new_groups = modifier.undo_groups_count() - groups;
    assert!(new_groups > 0, "Bearbeitung ohne History-Einträge");

    for _ in 0..new_groups {
        assert!(modifier.undo_group());
    }
    assert_eq!(modifier.layout_key_state(), before);
    assert!(modifier.has_redo());

    for _ in 0..new_groups {
        assert!(modifier.redo_group());
    }
    assert_eq!(modifier.layout_key_state(), after);
    assert!(!modifier.has_redo());
}

#[test]
fn test_laws_for_adding_elements() {
    check_laws(|modifier| {
        modifier.add_wire_segment(line(0, 20, 10, 20), InsertionMode::InsertOrDiscard);
        modifier.add_logicitem(
            LogicItemDefinition::new(LogicItemType::BufferElement, 1, Orientation::Down),
            Point::new(30, 30),
            InsertionMode::Collisions,
        );
    });
}

#[test]
fn test_laws_for_wire_branch_and_merge() {
    check_laws(|modifier| {
        // T-Verzweigung mitten auf der Leitung
        modifier.add_wire_segment(line(2, -5, 2, 0), InsertionMode::InsertOrDiscard);
        // kollineare Verlängerung
        modifier.add_wire_segment(line(4, 10, 4, 14), InsertionMode::InsertOrDiscard);
    });
}

#[test]
fn test_laws_for_partial_delete() {
    check_laws(|modifier| {
        let segment = modifier
            .layout()
            .segments()
            .find(|segment| modifier.layout().line(*segment) == line(8, 0, 8, 6))
            .expect("Segment erwartet");
        let mut selection = Selection::new();
        selection.add_segment(SegmentPart {
            segment,
            part: Part::new(2, 4),
        });
        modifier.delete_all(selection);
    });
}

#[test]
fn test_laws_for_mode_changes() {
    check_laws(|modifier| {
        let segment = modifier
            .layout()
            .segments()
            .next()
            .expect("Segment erwartet");
        let part = modifier.layout().full_part(segment);
        let segment_part = SegmentPart { segment, part };
        let temporary = modifier
            .change_wire_insertion_mode(segment_part, InsertionMode::Temporary)
            .expect("Teilbereich erwartet");
        let moved = modifier
            .move_or_delete_temporary_wire(temporary, 0, 30)
            .expect("Teilbereich erwartet");
        modifier.change_wire_insertion_mode(moved, InsertionMode::InsertOrDiscard);
    });
}

#[test]
fn test_laws_for_crosspoint_toggle() {
    check_laws(|modifier| {
        // eigene Leitung kreuzt die senkrechte bei (4, 3)
        modifier.add_wire_segment(line(2, 3, 6, 3), InsertionMode::InsertOrDiscard);
        modifier.toggle_wire_crosspoint(Point::new(4, 3));
    });
}

#[test]
fn test_laws_for_attribute_changes() {
    check_laws(|modifier| {
        modifier.toggle_inverter(Point::new(20, 1));
        let decoration_id = modifier
            .layout()
            .decoration_ids()
            .next()
            .expect("Dekoration erwartet");
        modifier.set_decoration_text(decoration_id, "Reset".to_string());
    });
}

#[test]
fn test_laws_for_tool_gestures() {
    check_laws(|modifier| {
        let mut wire = MouseTool::InsertWire(InsertWireTool::new());
        wire.press(modifier, Vec2::new(30.0, 0.0));
        wire.drag(modifier, Vec2::new(34.0, 5.0));
        wire.release(modifier, Vec2::new(34.0, 5.0));

        let mut area = MouseTool::SelectArea(SelectAreaTool::new(SelectionFunction::Add, false));
        area.press(modifier, Vec2::new(19.0, -1.0));
        area.drag(modifier, Vec2::new(24.0, 2.5));
        area.release(modifier, Vec2::new(24.0, 2.5));

        let mut mover = MouseTool::SelectMove(SelectMoveTool::new());
        mover.press(modifier, Vec2::new(21.0, 0.0));
        mover.drag(modifier, Vec2::new(21.0, 20.0));
        mover.release(modifier, Vec2::new(21.0, 20.0));
    });
}

#[test]
fn test_new_edit_discards_redo_tail() {
    let mut modifier = validating_modifier();
    modifier.add_wire_segment(line(0, 0, 5, 0), InsertionMode::InsertOrDiscard);
    modifier.add_wire_segment(line(0, 3, 5, 3), InsertionMode::InsertOrDiscard);

    assert!(modifier.undo_group());
    assert!(modifier.has_redo());

    modifier.add_wire_segment(line(0, 9, 5, 9), InsertionMode::InsertOrDiscard);
    assert!(!modifier.has_redo());
    assert!(!modifier.redo_group());
    assert_eq!(modifier.undo_groups_count(), 2);
}

#[test]
fn test_undo_without_history_changes_nothing() {
    let mut modifier = Modifier::new(ModifierConfig {
        enable_history: false,
        validate_messages: true,
        ..ModifierConfig::default()
    });
    modifier.add_wire_segment(line(0, 0, 5, 0), InsertionMode::InsertOrDiscard);

    assert!(!modifier.has_undo());
    assert!(!modifier.undo_group());
    assert_eq!(modifier.layout().segment_count(), 1);

    modifier.enable_history();
    modifier.add_wire_segment(line(0, 3, 5, 3), InsertionMode::InsertOrDiscard);
    assert!(modifier.undo_group());
    assert_eq!(modifier.layout().segment_count(), 1);
}

#[test]
fn test_visible_selection_is_restored_by_undo() {
    let mut modifier = validating_modifier();
    base_circuit(&mut modifier);

    modifier.begin_undo_group();
    modifier.add_visible_selection_rect(
        SelectionFunction::Add,
        editable_circuit::RectFine::new(Vec2::new(19.0, -1.0), Vec2::new(23.0, 2.0)),
    );
    modifier.apply_all_visible_selection_operations();
    modifier.finish_undo_group();
    let selected = modifier.visible_selection();
    assert_eq!(selected.selected_logicitems().count(), 1);

    // Löschen entfernt das Element auch aus der sichtbaren Selektion
    modifier.delete_all(selected.clone());
    assert!(modifier.visible_selection().is_empty());

    modifier.undo_group();
    assert_eq!(modifier.visible_selection(), selected);
}

#[test]
fn test_applied_area_selection_is_undone_and_redone() {
    let mut modifier = validating_modifier();
    base_circuit(&mut modifier);

    modifier.begin_undo_group();
    modifier.add_visible_selection_rect(
        SelectionFunction::Add,
        editable_circuit::RectFine::new(Vec2::new(19.0, -1.0), Vec2::new(20.5, 0.5)),
    );
    modifier.update_visible_selection_rect(editable_circuit::RectFine::new(
        Vec2::new(19.0, -1.0),
        Vec2::new(23.0, 2.0),
    ));
    modifier.apply_all_visible_selection_operations();
    modifier.finish_undo_group();
    let selected = modifier.visible_selection();
    assert_eq!(selected.selected_logicitems().count(), 1);

    assert!(modifier.undo_group());
    assert!(modifier.visible_selection().is_empty());

    assert!(modifier.redo_group());
    assert_eq!(modifier.visible_selection(), selected);
}
