//! Zufällige Editierfolgen mit festem Seed.
//!
//! Nach jedem Schritt prüft der Modifier Indizes, Schlüssel und Selektionen
//! gegen einen Neuaufbau; zusätzlich wird hier geprüft, dass der Anzeigezustand
//! zum angeforderten Einfügemodus passt.

use editable_circuit::core::logicitem::to_insertion_mode;
use editable_circuit::core::random::{
    random_insertion_mode, random_line, random_logicitem_definition, random_point,
};
use editable_circuit::core::Grid;
use editable_circuit::{
    add_random_circuit, DisplayState, InsertionMode, LogicItemId, Modifier, ModifierConfig,
    RandomCircuitOptions, SegmentPart, Selection,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GRID_MIN: Grid = Grid(0);
const GRID_MAX: Grid = Grid(25);

fn validating_modifier() -> Modifier {
    Modifier::new(ModifierConfig {
        validate_messages: true,
        ..ModifierConfig::default()
    })
}

fn assert_logicitem_mode(modifier: &Modifier, logicitem_id: LogicItemId, mode: InsertionMode) {
    let state = modifier.layout().logicitem(logicitem_id).display_state;
    assert_eq!(to_insertion_mode(state), mode, "{logicitem_id} hat Zustand {state:?}");
}

fn assert_wire_mode(modifier: &Modifier, segment_part: SegmentPart, mode: InsertionMode) {
    let (state_0, state_1) = modifier.layout().segment_display_states(segment_part);
    assert_eq!(to_insertion_mode(state_0), mode);
    assert_eq!(to_insertion_mode(state_1), mode);
}

fn random_logicitem(modifier: &Modifier, rng: &mut StdRng) -> Option<LogicItemId> {
    let count = modifier.layout().logicitem_count();
    (count > 0).then(|| LogicItemId::from_index(rng.gen_range(0..count)))
}

fn random_full_segment(modifier: &Modifier, rng: &mut StdRng) -> Option<SegmentPart> {
    let segments: Vec<_> = modifier.layout().segments().collect();
    if segments.is_empty() {
        return None;
    }
    let segment = segments[rng.gen_range(0..segments.len())];
    Some(SegmentPart {
        segment,
        part: modifier.layout().full_part(segment),
    })
}

/// Ein zufälliger Schritt, jeweils als eigene Undo-Gruppe.
fn random_step(modifier: &mut Modifier, rng: &mut StdRng) {
    match rng.gen_range(0..9) {
        0 => {
            let mode = random_insertion_mode(rng);
            let definition = random_logicitem_definition(rng);
            let position = random_point(rng, GRID_MIN, GRID_MAX);
            if let Some(logicitem_id) = modifier.add_logicitem(definition, position, mode) {
                assert_logicitem_mode(modifier, logicitem_id, mode);
            } else {
                assert_eq!(mode, InsertionMode::InsertOrDiscard);
            }
        }
        1 | 2 => {
            let mode = random_insertion_mode(rng);
            let line = random_line(rng, GRID_MIN, GRID_MAX, 8);
            if let Some(segment_part) = modifier.add_wire_segment(line, mode) {
                assert_wire_mode(modifier, segment_part, mode);
            } else {
                assert_eq!(mode, InsertionMode::InsertOrDiscard);
            }
        }
        3 => {
            if let Some(logicitem_id) = random_logicitem(modifier, rng) {
                let mode = random_insertion_mode(rng);
                if let Some(logicitem_id) = modifier.change_logicitem_insertion_mode(logicitem_id, mode) {
                    assert_logicitem_mode(modifier, logicitem_id, mode);
                }
            }
        }
        4 => {
            if let Some(segment_part) = random_full_segment(modifier, rng) {
                let mode = random_insertion_mode(rng);
                if let Some(segment_part) = modifier.change_wire_insertion_mode(segment_part, mode) {
                    assert_wire_mode(modifier, segment_part, mode);
                }
            }
        }
        5 => {
            if let Some(logicitem_id) = random_logicitem(modifier, rng) {
                if modifier.layout().logicitem(logicitem_id).display_state == DisplayState::Temporary {
                    let dx = rng.gen_range(-5..=5);
                    let dy = rng.gen_range(-5..=5);
                    modifier.move_or_delete_temporary_logicitem(logicitem_id, dx, dy);
                }
            }
        }
        6 => {
            if let Some(segment_part) = random_full_segment(modifier, rng) {
                if segment_part.segment.wire_id.is_temporary() {
                    if rng.gen_bool(0.5) {
                        modifier.delete_temporary_wire_segment(segment_part);
                    } else {
                        modifier.move_or_delete_temporary_wire(segment_part, 3, -2);
                    }
                }
            }
        }
        7 => {
            modifier.undo_group();
        }
        _ => {
            modifier.redo_group();
        }
    }
}

#[test]
fn test_random_edit_sequences_keep_invariants() {
    for seed in 0..12 {
        let mut modifier = validating_modifier();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..60 {
            random_step(&mut modifier, &mut rng);
            assert!(!modifier.has_ungrouped_undo_entries());
        }
        modifier.validate().expect("gültiger Zustand erwartet");
    }
}

#[test]
fn test_random_groups_obey_undo_redo_laws() {
    for seed in 100..110 {
        let mut modifier = validating_modifier();
        let mut rng = StdRng::seed_from_u64(seed);
        let options = RandomCircuitOptions {
            seed,
            logicitem_count: 6,
            wire_count: 12,
            grid_max: GRID_MAX.0,
            ..RandomCircuitOptions::default()
        };
        add_random_circuit(&mut modifier, &mut rng, &options);
        let before = modifier.layout_key_state();

        modifier.begin_undo_group();
        for _ in 0..10 {
            // nur neue Bearbeitungen, kein Undo innerhalb der Gruppe
            let mode = random_insertion_mode(&mut rng);
            let line = random_line(&mut rng, GRID_MIN, GRID_MAX, 6);
            modifier.add_wire_segment(line, mode);
            if let Some(logicitem_id) = random_logicitem(&modifier, &mut rng) {
                let mode = random_insertion_mode(&mut rng);
                modifier.change_logicitem_insertion_mode(logicitem_id, mode);
            }
        }
        if !modifier.finish_undo_group() {
            continue;
        }
        let after = modifier.layout_key_state();

        assert!(modifier.undo_group());
        assert_eq!(modifier.layout_key_state(), before, "Undo bei Seed {seed}");
        assert!(modifier.redo_group());
        assert_eq!(modifier.layout_key_state(), after, "Redo bei Seed {seed}");
    }
}

#[test]
fn test_tracked_selection_stays_valid_under_random_edits() {
    for seed in 200..206 {
        let mut modifier = validating_modifier();
        let mut rng = StdRng::seed_from_u64(seed);
        let options = RandomCircuitOptions {
            seed,
            logicitem_count: 6,
            wire_count: 15,
            grid_max: GRID_MAX.0,
            ..RandomCircuitOptions::default()
        };
        add_random_circuit(&mut modifier, &mut rng, &options);

        let mut selection = Selection::new();
        for logicitem_id in modifier.layout().logicitem_ids() {
            if rng.gen_bool(0.5) {
                selection.add_logicitem(logicitem_id);
            }
        }
        let parts: Vec<SegmentPart> = modifier
            .layout()
            .segments()
            .map(|segment| SegmentPart {
                segment,
                part: modifier.layout().full_part(segment),
            })
            .collect();
        for segment_part in parts {
            selection.add_segment(segment_part);
        }
        let selection_id = modifier.create_selection(selection);

        for _ in 0..40 {
            random_step(&mut modifier, &mut rng);
            assert!(modifier.selection(selection_id).is_valid(modifier.layout()));
        }
        modifier.destroy_selection(selection_id);
    }
}
