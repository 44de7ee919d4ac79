//! Zusammengesetzte Leitungsoperationen.
//!
//! Teilbereiche werden über eine verfolgte Selektion adressiert, da Teilen und
//! Verschmelzen während einer Operation Segment-Ids verändern.

use std::collections::HashMap;

use crate::app::circuit_data::CircuitData;
use crate::app::selection_store::SelectionId;
use crate::core::geometry::orthogonal_lines;
use crate::core::logicitem::to_insertion_mode;
use crate::core::segment_tree::updated_segment_info;
use crate::core::selection::selection_of_part;
use crate::core::{
    Endpoints, InsertionMode, LineInsertionType, OrderedLine, Orientation, Point, Segment,
    SegmentKey, SegmentPart, SegmentPointType, Selection,
};

use super::wire_detail::{
    add_temporary_segment, delete_temporary_segment, fix_and_merge_segments,
    insert_full_segment, is_segment_position_representable, is_wire_colliding, isolate_part,
    mark_valid, merge_segments, move_temporary_segment_unchecked, reset_endpoints, set_endpoints,
    set_wire_inputs_at_logicitem_outputs, split_segment, to_colliding_tree, to_temporary_tree,
    uninsert_full_segment, unmark_valid,
};

// ── Einfügemodus ────────────────────────────────────────────────────

fn tracked_part(circuit: &CircuitData, tracked: SelectionId) -> Option<SegmentPart> {
    circuit
        .selection_store
        .get(tracked)
        .selected_segment_parts()
        .into_iter()
        .next()
}

fn temporary_to_colliding(circuit: &mut CircuitData, tracked: SelectionId) {
    let Some(segment_part) = tracked_part(circuit, tracked) else {
        return;
    };
    let line = circuit.layout.part_line(segment_part);
    let colliding = is_wire_colliding(circuit, line);

    let segment = isolate_part(circuit, segment_part);
    reset_endpoints(circuit, segment);

    if colliding {
        to_colliding_tree(circuit, segment);
        return;
    }

    set_wire_inputs_at_logicitem_outputs(circuit, segment);
    insert_full_segment(circuit, segment);
    fix_and_merge_segments(circuit, line.p0);
    fix_and_merge_segments(circuit, line.p1);

    if let Some(segment_part) = tracked_part(circuit, tracked) {
        mark_valid(circuit, segment_part);
    }
}

fn colliding_to_insert(circuit: &mut CircuitData, tracked: SelectionId) {
    let Some(segment_part) = tracked_part(circuit, tracked) else {
        return;
    };
    let wire_id = segment_part.segment.wire_id;

    if wire_id.is_inserted() {
        unmark_valid(circuit, segment_part);
    } else if wire_id.is_colliding() {
        let segment = isolate_part(circuit, segment_part);
        let segment = to_temporary_tree(circuit, segment);
        delete_temporary_segment(circuit, segment);
    } else {
        panic!("{} ist weder eingefügt noch kollidierend", segment_part.segment);
    }
}

fn insert_to_colliding(circuit: &mut CircuitData, tracked: SelectionId) {
    if let Some(segment_part) = tracked_part(circuit, tracked) {
        mark_valid(circuit, segment_part);
    }
}

fn colliding_to_temporary(circuit: &mut CircuitData, tracked: SelectionId) {
    let Some(segment_part) = tracked_part(circuit, tracked) else {
        return;
    };

    if segment_part.segment.wire_id.is_colliding() {
        let segment = isolate_part(circuit, segment_part);
        to_temporary_tree(circuit, segment);
        return;
    }

    unmark_valid(circuit, segment_part);
    let segment = isolate_part(circuit, segment_part);
    let line = circuit.layout.line(segment);
    let segment = uninsert_full_segment(circuit, segment);
    reset_endpoints(circuit, segment);

    fix_and_merge_segments(circuit, line.p0);
    fix_and_merge_segments(circuit, line.p1);
}

/// Überführt einen Teilbereich in den angeforderten Einfügemodus.
///
/// Liefert den neuen Ort des Teilbereichs, `None` wenn er verworfen wurde.
pub fn change_wire_insertion_mode(
    circuit: &mut CircuitData,
    segment_part: SegmentPart,
    new_mode: InsertionMode,
) -> Option<SegmentPart> {
    let (state_0, state_1) = circuit.layout.segment_display_states(segment_part);
    let old_modes = (to_insertion_mode(state_0), to_insertion_mode(state_1));
    if old_modes == (new_mode, new_mode) {
        return Some(segment_part);
    }

    let tracked = circuit
        .selection_store
        .create(selection_of_part(segment_part.segment, segment_part.part));

    if old_modes.0 == InsertionMode::Temporary || old_modes.1 == InsertionMode::Temporary {
        temporary_to_colliding(circuit, tracked);
    }
    if new_mode == InsertionMode::InsertOrDiscard {
        colliding_to_insert(circuit, tracked);
    }
    let was_inserted =
        old_modes.0 == InsertionMode::InsertOrDiscard || old_modes.1 == InsertionMode::InsertOrDiscard;
    if was_inserted && new_mode != InsertionMode::InsertOrDiscard {
        insert_to_colliding(circuit, tracked);
    }
    if new_mode == InsertionMode::Temporary {
        colliding_to_temporary(circuit, tracked);
    }

    let result = tracked_part(circuit, tracked);
    circuit.selection_store.destroy(tracked);
    result
}

/// Legt eine neue Leitungslinie an und überführt sie in den Modus.
pub fn add_wire_segment(
    circuit: &mut CircuitData,
    line: OrderedLine,
    mode: InsertionMode,
) -> Option<SegmentPart> {
    let segment = add_temporary_segment(circuit, line, Endpoints::SHADOW, None);
    let segment_part = SegmentPart {
        segment,
        part: line.full_part(),
    };
    change_wire_insertion_mode(circuit, segment_part, mode)
}

/// Legt eine L-förmige Verbindung zwischen zwei Punkten an.
pub fn add_wire_segments(
    circuit: &mut CircuitData,
    p0: Point,
    p1: Point,
    kind: LineInsertionType,
    mode: InsertionMode,
) -> Vec<SegmentPart> {
    // spätere Linien können frühere verschieben oder verschmelzen
    let tracked = circuit.selection_store.create(Selection::new());
    for line in orthogonal_lines(p0, p1, kind) {
        if let Some(segment_part) = add_wire_segment(circuit, line, mode) {
            circuit
                .selection_store
                .get_mut(tracked)
                .add_segment(segment_part);
        }
    }
    circuit
        .selection_store
        .take(tracked)
        .selected_segment_parts()
}

// ── Löschen und Verschieben ─────────────────────────────────────────

pub fn delete_temporary_wire_segment(circuit: &mut CircuitData, segment_part: SegmentPart) {
    assert!(
        segment_part.segment.wire_id.is_temporary(),
        "nur temporäre Leitungen können gelöscht werden"
    );
    let segment = isolate_part(circuit, segment_part);
    delete_temporary_segment(circuit, segment);
}

pub fn is_wire_position_representable(
    circuit: &CircuitData,
    segment_part: SegmentPart,
    dx: i32,
    dy: i32,
) -> bool {
    is_segment_position_representable(circuit, segment_part, dx, dy)
}

/// Verschiebt ein vollständiges temporäres Segment.
pub fn move_temporary_wire_unchecked(
    circuit: &mut CircuitData,
    segment_part: SegmentPart,
    dx: i32,
    dy: i32,
) {
    assert!(
        circuit.layout.is_full_segment(segment_part),
        "nur vollständige Segmente können ungeprüft verschoben werden"
    );
    move_temporary_segment_unchecked(circuit, segment_part.segment, dx, dy);
}

/// Verschiebt einen temporären Teilbereich oder löscht ihn, wenn das Ziel
/// nicht darstellbar ist.
pub fn move_or_delete_temporary_wire(
    circuit: &mut CircuitData,
    segment_part: SegmentPart,
    dx: i32,
    dy: i32,
) -> Option<SegmentPart> {
    assert!(
        segment_part.segment.wire_id.is_temporary(),
        "nur temporäre Leitungen können verschoben werden"
    );
    let representable = is_wire_position_representable(circuit, segment_part, dx, dy);
    let segment = isolate_part(circuit, segment_part);

    if !representable {
        delete_temporary_segment(circuit, segment);
        return None;
    }
    move_temporary_segment_unchecked(circuit, segment, dx, dy);
    Some(SegmentPart {
        segment,
        part: circuit.layout.full_part(segment),
    })
}

// ── Kreuzungspunkte ─────────────────────────────────────────────────

fn delete_all_inserted_wires_at(circuit: &mut CircuitData, point: Point) {
    loop {
        let segments = circuit.index.spatial_index().query_line_segments(point);
        let Some(segment) = segments.first().copied() else {
            break;
        };
        let segment_part = SegmentPart {
            segment,
            part: circuit.layout.full_part(segment),
        };
        if let Some(segment_part) =
            change_wire_insertion_mode(circuit, segment_part, InsertionMode::Temporary)
        {
            delete_temporary_wire_segment(circuit, segment_part);
        }
    }
}

fn add_wire_crosspoint(circuit: &mut CircuitData, point: Point) {
    let segments = circuit.index.spatial_index().query_line_segments(point);
    let [segment_0, segment_1] = segments.as_slice() else {
        return;
    };
    if segment_0.wire_id == segment_1.wire_id {
        return;
    }
    let input_count = circuit.layout.segment_tree(segment_0.wire_id).input_count()
        + circuit.layout.segment_tree(segment_1.wire_id).input_count();
    if input_count > 1 {
        log::debug!("Kreuzung bei {point} würde zwei getriebene Netze verbinden");
        return;
    }

    let line_0 = circuit.layout.line(*segment_0);
    let line_1 = circuit.layout.line(*segment_1);
    if !line_0.is_inside(point) || !line_1.is_inside(point) {
        return;
    }

    delete_all_inserted_wires_at(circuit, point);
    for (a, b) in [
        (line_0.p0, point),
        (point, line_0.p1),
        (line_1.p0, point),
        (point, line_1.p1),
    ] {
        add_wire_segment(
            circuit,
            OrderedLine::from_points(a, b),
            InsertionMode::InsertOrDiscard,
        );
    }
}

fn remove_wire_crosspoint(circuit: &mut CircuitData, point: Point) {
    let segments = circuit.index.spatial_index().query_line_segments(point);
    if segments.len() != 4 {
        return;
    }

    // links, oben, unten, rechts
    let mut lines: Vec<OrderedLine> = segments
        .iter()
        .map(|segment| circuit.layout.line(*segment))
        .collect();
    lines.sort();
    let horizontal = OrderedLine::from_points(lines[0].p0, lines[3].p1);
    let vertical = OrderedLine::from_points(lines[1].p0, lines[2].p1);

    delete_all_inserted_wires_at(circuit, point);
    add_wire_segment(circuit, horizontal, InsertionMode::InsertOrDiscard);
    add_wire_segment(circuit, vertical, InsertionMode::InsertOrDiscard);
}

/// Verbindet zwei sich kreuzende Leitungen oder trennt einen Kreuzungspunkt.
pub fn toggle_wire_crosspoint(circuit: &mut CircuitData, point: Point) {
    let collisions = circuit.index.collision_index();
    if collisions.is_wires_crossing(point) {
        add_wire_crosspoint(circuit, point);
    } else if collisions.is_wire_cross_point(point) {
        remove_wire_crosspoint(circuit, point);
    }
}

// ── Regularisierung temporärer Selektionen ──────────────────────────

fn sorted_points(mut points: Vec<Point>) -> Vec<Point> {
    points.sort();
    points.dedup();
    points
}

/// Kreuzungspunkte der eingefügten Segmente einer Selektion.
pub fn get_inserted_cross_points(circuit: &CircuitData, selection: &Selection) -> Vec<Point> {
    let mut points = Vec::new();
    for (segment, _) in selection.selected_segments() {
        if !segment.wire_id.is_inserted() {
            continue;
        }
        let info = circuit.layout.segment_info(segment);
        if info.p0_type == SegmentPointType::CrossPoint {
            points.push(info.line.p0);
        }
        if info.p1_type == SegmentPointType::CrossPoint {
            points.push(info.line.p1);
        }
    }
    sorted_points(points)
}

/// Innere Punkte temporärer Segmente, an denen eingefügte Leitungen
/// Anschlüsse, Ecken oder Kreuzungen haben.
pub fn get_temporary_selection_splitpoints(
    circuit: &CircuitData,
    selection: &Selection,
) -> Vec<Point> {
    let collisions = circuit.index.collision_index();
    let mut points = Vec::new();

    for (segment, _) in selection.selected_segments() {
        if !segment.wire_id.is_temporary() {
            continue;
        }
        let line = circuit.layout.line(segment);
        points.extend(line.inner_points().filter(|point| {
            let data = collisions.query(*point);
            data.is_wire_connection() || data.is_wire_corner_point() || data.is_wire_cross_point()
        }));
    }
    sorted_points(points)
}

/// Teilt alle temporären Segmente der Selektion an den gegebenen Punkten.
pub fn split_temporary_segments(circuit: &mut CircuitData, selection: &Selection, points: &[Point]) {
    let segments: Vec<Segment> = selection
        .selected_segments()
        .map(|(segment, _)| segment)
        .collect();

    for segment in segments {
        assert!(segment.wire_id.is_temporary(), "{segment} ist nicht temporär");
        let line = circuit.layout.line(segment);
        let mut inside: Vec<Point> = points
            .iter()
            .copied()
            .filter(|point| line.is_inside(*point))
            .collect();
        inside.sort();
        inside.dedup();

        // von hinten, damit das Ursprungssegment den vorderen Teil behält
        for point in inside.into_iter().rev() {
            let offset = circuit.layout.line(segment).to_offset(point);
            split_segment(circuit, segment, offset, None);
        }
    }
}

pub fn set_temporary_endpoints(circuit: &mut CircuitData, segment: Segment, endpoints: Endpoints) {
    assert!(segment.wire_id.is_temporary(), "{segment} ist nicht temporär");
    assert!(
        endpoints.valid_for_temporary(),
        "temporäre Segmente tragen nur Schatten- oder Kreuzungspunkte"
    );
    set_endpoints(circuit, segment, endpoints);
}

/// Verschmilzt zwei nicht eingefügte Segmente derselben Leitung.
pub fn merge_uninserted_segment(circuit: &mut CircuitData, a: Segment, b: Segment) -> Segment {
    assert!(
        !a.wire_id.is_inserted() && !b.wire_id.is_inserted(),
        "eingefügte Segmente werden beim Einfügen verschmolzen"
    );
    merge_segments(circuit, a, b)
}

fn orientation_slot(orientation: Orientation) -> usize {
    match orientation {
        Orientation::Right => 0,
        Orientation::Left => 1,
        Orientation::Up => 2,
        Orientation::Down => 3,
        Orientation::Undirected => panic!("Leitungsenden sind immer gerichtet"),
    }
}

type EndpointMap = HashMap<Point, [Option<SegmentKey>; 4]>;

fn build_endpoint_map(circuit: &CircuitData, selection: &Selection) -> EndpointMap {
    let mut map = EndpointMap::new();
    for (segment, _) in selection.selected_segments() {
        let line = circuit.layout.line(segment);
        let key = circuit.keys.segment_key(segment);
        for (point, orientation) in [(line.p0, line.orientation_p0()), (line.p1, line.orientation_p1())] {
            map.entry(point).or_default()[orientation_slot(orientation)] = Some(key);
        }
    }
    map
}

fn resolve(redirects: &HashMap<SegmentKey, SegmentKey>, mut key: SegmentKey) -> SegmentKey {
    while let Some(next) = redirects.get(&key) {
        key = *next;
    }
    key
}

/// Setzt Kreuzungspunkte und verschmilzt gerade Fortsetzungen innerhalb
/// einer temporären Selektion.
///
/// Mit `true_cross_points` werden nur dort Kreuzungen gesetzt, sonst an
/// jedem Punkt mit mindestens drei Segmentenden. Liefert die gesetzten
/// Kreuzungspunkte.
pub fn regularize_temporary_selection(
    circuit: &mut CircuitData,
    selection: &Selection,
    true_cross_points: Option<Vec<Point>>,
) -> Vec<Point> {
    let tracked = circuit.selection_store.create(selection.clone());

    let true_cross_points = true_cross_points.map(|points| {
        let points = sorted_points(points);
        let snapshot = circuit.selection_store.get(tracked).clone();
        split_temporary_segments(circuit, &snapshot, &points);
        points
    });

    let snapshot = circuit.selection_store.get(tracked).clone();
    let mut entries: Vec<(Point, [Option<SegmentKey>; 4])> =
        build_endpoint_map(circuit, &snapshot).into_iter().collect();
    entries.sort_by_key(|(point, _)| *point);

    let mut cross_points = Vec::new();
    let mut merge_pairs = Vec::new();

    for (point, slots) in entries {
        let [right, left, up, down] = slots;
        let count = slots.iter().flatten().count();

        if count >= 3 {
            let is_cross = count == 3
                || true_cross_points
                    .as_ref()
                    .is_none_or(|points| points.binary_search(&point).is_ok());
            if is_cross {
                cross_points.push(point);
                if let Some(key) = right.or(left) {
                    let segment = circuit.keys.segment(key);
                    let info = updated_segment_info(
                        circuit.layout.segment_info(segment),
                        point,
                        SegmentPointType::CrossPoint,
                    );
                    set_temporary_endpoints(circuit, segment, info.endpoints());
                }
            } else {
                merge_pairs.extend([(right, left), (up, down)]);
            }
        } else if count == 2 {
            merge_pairs.extend([(right, left), (up, down)]);
        }
    }

    let mut redirects: HashMap<SegmentKey, SegmentKey> = HashMap::new();
    for pair in merge_pairs {
        let (Some(key_a), Some(key_b)) = pair else {
            continue;
        };
        let key_a = resolve(&redirects, key_a);
        let key_b = resolve(&redirects, key_b);
        if key_a == key_b {
            continue;
        }
        let segment_a = circuit.keys.segment(key_a);
        let segment_b = circuit.keys.segment(key_b);
        let merged = merge_uninserted_segment(circuit, segment_a, segment_b);
        let surviving = circuit.keys.segment_key(merged);
        let removed = if surviving == key_a { key_b } else { key_a };
        redirects.insert(removed, surviving);
    }

    circuit.selection_store.destroy(tracked);
    cross_points
}
