//! Primitive Leitungsoperationen.
//!
//! Jede Funktion hält Layout, Indizes und Schlüssel über Nachrichten synchron.
//! Operationen mit eigener History legen ihr inverses Primitiv ab, die
//! Baumverschiebungen dagegen sind reine Hilfsschritte und werden über
//! [`insert_full_segment`] und [`uninsert_full_segment`] aufgezeichnet.

use crate::app::circuit_data::CircuitData;
use crate::app::history::HistoryEntry;
use crate::core::geometry::{lines_touching_collinear, orientations_compatible};
use crate::core::part_selection::iter_parts_partial;
use crate::core::segment_tree::updated_segment_info;
use crate::core::{
    Endpoints, InfoMessage, Offset, OrderedLine, Part, Point, Segment, SegmentIndex, SegmentInfo,
    SegmentKey, SegmentPart, SegmentPointType, WireId,
};

// ── Temporäre Segmente ──────────────────────────────────────────────

/// Fügt ein temporäres Segment hinzu, optional mit vorgegebenem Schlüssel.
pub fn add_temporary_segment(
    circuit: &mut CircuitData,
    line: OrderedLine,
    endpoints: Endpoints,
    key: Option<SegmentKey>,
) -> Segment {
    let segment_index = circuit
        .layout
        .segment_tree_mut(WireId::TEMPORARY)
        .add_segment(SegmentInfo::new(line, endpoints));
    let segment = Segment::new(WireId::TEMPORARY, segment_index);
    circuit.submit(InfoMessage::SegmentCreated {
        segment,
        size: Offset(line.length() as u16),
    });

    if let Some(key) = key {
        circuit.keys.set_segment_key(segment, key);
    }
    let key = circuit.keys.segment_key(segment);
    circuit.push_history(HistoryEntry::SegmentDeleteTemporary { key });

    segment
}

pub fn delete_temporary_segment(circuit: &mut CircuitData, segment: Segment) {
    assert!(
        segment.wire_id.is_temporary(),
        "nur temporäre Segmente können gelöscht werden"
    );
    let info = circuit.layout.segment_info(segment);
    let key = circuit.keys.segment_key(segment);

    let selected: Vec<Part> = circuit
        .visible_selection
        .initial_selection()
        .segment_parts(segment)
        .map(|parts| parts.iter().collect())
        .unwrap_or_default();
    for part in selected {
        circuit.push_history(HistoryEntry::SegmentAddVisibleSelection { key, part });
    }
    circuit.push_history(HistoryEntry::SegmentCreateTemporary {
        key,
        line: info.line,
        endpoints: info.endpoints(),
    });

    let tree = circuit.layout.segment_tree_mut(WireId::TEMPORARY);
    let last_index = tree.last_index();
    tree.swap_and_delete_segment(segment.segment_index);

    circuit.submit(InfoMessage::SegmentPartDeleted {
        segment_part: SegmentPart {
            segment,
            part: info.line.full_part(),
        },
        delete_segment: true,
    });
    if last_index != segment.segment_index {
        circuit.submit(InfoMessage::SegmentIdUpdated {
            new_segment: segment,
            old_segment: Segment::new(WireId::TEMPORARY, last_index),
        });
    }
}

pub fn is_segment_position_representable(
    circuit: &CircuitData,
    segment_part: SegmentPart,
    dx: i32,
    dy: i32,
) -> bool {
    circuit
        .layout
        .part_line(segment_part)
        .is_representable_offset(dx, dy)
}

pub fn move_temporary_segment_unchecked(
    circuit: &mut CircuitData,
    segment: Segment,
    dx: i32,
    dy: i32,
) {
    assert!(
        segment.wire_id.is_temporary(),
        "nur temporäre Segmente können verschoben werden"
    );
    let info = circuit.layout.segment_info(segment);
    let moved = SegmentInfo {
        line: info.line.offset_unchecked(dx, dy),
        ..info
    };
    circuit
        .layout
        .segment_tree_mut(WireId::TEMPORARY)
        .update_segment(segment.segment_index, moved);

    let key = circuit.keys.segment_key(segment);
    circuit.push_history(HistoryEntry::SegmentMoveTemporary {
        key,
        dx: -dx,
        dy: -dy,
    });
}

// ── Teilen und Verschmelzen ─────────────────────────────────────────

/// Teilt ein Segment bei `offset`. Das Ursprungssegment behält den vorderen
/// Teil, das zurückgegebene neue Segment erhält den hinteren.
pub fn split_segment(
    circuit: &mut CircuitData,
    segment: Segment,
    offset: Offset,
    new_key: Option<SegmentKey>,
) -> Segment {
    let info = circuit.layout.segment_info(segment);
    let full = info.line.full_part();
    assert!(
        full.begin < offset && offset < full.end,
        "{segment} kann nicht bei {offset} geteilt werden"
    );
    let inserted = segment.wire_id.is_inserted();

    if inserted {
        circuit.submit(InfoMessage::SegmentUninserted { segment, info });
    }

    let moved_part = Part::new(offset.0, full.end.0);
    let tree = circuit.layout.segment_tree_mut(segment.wire_id);
    let new_index = tree.copy_segment_within(segment.segment_index, moved_part);
    tree.shrink_segment(segment.segment_index, Part::new(full.begin.0, offset.0));
    let new_segment = Segment::new(segment.wire_id, new_index);

    circuit.submit(InfoMessage::SegmentPartMoved {
        destination: SegmentPart {
            segment: new_segment,
            part: Part::new(0, full.end.0 - offset.0),
        },
        source: SegmentPart {
            segment,
            part: moved_part,
        },
        create_destination: true,
        delete_source: false,
    });

    if inserted {
        for piece in [segment, new_segment] {
            let info = circuit.layout.segment_info(piece);
            circuit.submit(InfoMessage::SegmentInserted {
                segment: piece,
                info,
            });
        }
    }

    if let Some(key) = new_key {
        circuit.keys.set_segment_key(new_segment, key);
    }
    let key_0 = circuit.keys.segment_key(segment);
    let key_1 = circuit.keys.segment_key(new_segment);
    circuit.push_history(HistoryEntry::SegmentMerge { key_0, key_1 });

    new_segment
}

/// Schneidet `part` als eigenes Segment heraus und gibt es zurück.
pub fn isolate_part(circuit: &mut CircuitData, segment_part: SegmentPart) -> Segment {
    let full = circuit.layout.full_part(segment_part.segment);
    let part = segment_part.part;
    let mut segment = segment_part.segment;

    if part.end < full.end {
        split_segment(circuit, segment, part.end, None);
    }
    if part.begin > full.begin {
        segment = split_segment(circuit, segment, part.begin, None);
    }
    segment
}

/// Verschmilzt zwei kollinear aneinanderstoßende Segmente derselben Leitung.
///
/// Das Ergebnis liegt auf dem kleineren Index und trägt den Schlüssel des
/// vorderen Segments.
pub fn merge_segments(circuit: &mut CircuitData, a: Segment, b: Segment) -> Segment {
    assert_eq!(a.wire_id, b.wire_id, "Segmente verschiedener Leitungen");
    assert_ne!(a, b, "Segment {a} kann nicht mit sich selbst verschmolzen werden");
    let wire_id = a.wire_id;

    let info_a = circuit.layout.segment_info(a);
    let info_b = circuit.layout.segment_info(b);
    assert!(
        lines_touching_collinear(info_a.line, info_b.line),
        "{a} und {b} berühren sich nicht kollinear"
    );

    let (first, info_first, second, info_second) = if info_a.line < info_b.line {
        (a, info_a, b, info_b)
    } else {
        (b, info_b, a, info_a)
    };
    let (keep, delete) = if a.segment_index < b.segment_index {
        (a, b)
    } else {
        (b, a)
    };
    let (info_keep, info_delete) = if keep == first {
        (info_first, info_second)
    } else {
        (info_second, info_first)
    };

    let key_first = circuit.keys.segment_key(first);
    let key_second = circuit.keys.segment_key(second);
    if info_first.p1_type != SegmentPointType::ShadowPoint {
        circuit.push_history(HistoryEntry::SegmentSetEndpoints {
            key: key_first,
            endpoints: info_first.endpoints(),
        });
    }
    if info_second.p0_type != SegmentPointType::ShadowPoint {
        circuit.push_history(HistoryEntry::SegmentSetEndpoints {
            key: key_second,
            endpoints: info_second.endpoints(),
        });
    }
    circuit.push_history(HistoryEntry::SegmentSplit {
        key: key_first,
        offset: Offset(info_first.line.length() as u16),
        new_key: key_second,
    });

    let inserted = wire_id.is_inserted();
    if inserted {
        circuit.submit(InfoMessage::SegmentUninserted {
            segment: a,
            info: info_a,
        });
        circuit.submit(InfoMessage::SegmentUninserted {
            segment: b,
            info: info_b,
        });
    }

    let tree = circuit.layout.segment_tree_mut(wire_id);
    let last_index = tree.last_index();
    tree.swap_and_merge_segment(keep.segment_index, delete.segment_index);
    let merged = *tree.info(keep.segment_index);

    if keep == second {
        circuit.submit(InfoMessage::SegmentPartMoved {
            destination: SegmentPart {
                segment: keep,
                part: merged.line.to_part(info_keep.line),
            },
            source: SegmentPart {
                segment: keep,
                part: info_keep.line.full_part(),
            },
            create_destination: false,
            delete_source: false,
        });
    }
    circuit.submit(InfoMessage::SegmentPartMoved {
        destination: SegmentPart {
            segment: keep,
            part: merged.line.to_part(info_delete.line),
        },
        source: SegmentPart {
            segment: delete,
            part: info_delete.line.full_part(),
        },
        create_destination: false,
        delete_source: true,
    });

    if inserted {
        circuit.submit(InfoMessage::SegmentInserted {
            segment: keep,
            info: merged,
        });
    }

    if last_index != delete.segment_index {
        let moved = Segment::new(wire_id, last_index);
        circuit.submit(InfoMessage::SegmentIdUpdated {
            new_segment: delete,
            old_segment: moved,
        });
        if inserted {
            let info = circuit.layout.segment_info(delete);
            circuit.submit(InfoMessage::InsertedSegmentIdUpdated {
                new_segment: delete,
                old_segment: moved,
                info,
            });
        }
    }

    if circuit.keys.segment_key(keep) != key_first {
        circuit.keys.set_segment_key(keep, key_first);
    }
    keep
}

// ── Endpunkte ───────────────────────────────────────────────────────

pub fn set_endpoints(circuit: &mut CircuitData, segment: Segment, endpoints: Endpoints) {
    let old_info = circuit.layout.segment_info(segment);
    if old_info.endpoints() == endpoints {
        return;
    }
    let new_info = SegmentInfo::new(old_info.line, endpoints);
    circuit
        .layout
        .segment_tree_mut(segment.wire_id)
        .update_segment(segment.segment_index, new_info);

    if segment.wire_id.is_inserted() {
        circuit.submit(InfoMessage::InsertedEndPointsUpdated {
            segment,
            new_info,
            old_info,
        });
    }

    let key = circuit.keys.segment_key(segment);
    circuit.push_history(HistoryEntry::SegmentSetEndpoints {
        key,
        endpoints: old_info.endpoints(),
    });
}

pub fn reset_endpoints(circuit: &mut CircuitData, segment: Segment) {
    set_endpoints(circuit, segment, Endpoints::SHADOW);
}

fn set_point_type(
    circuit: &mut CircuitData,
    segment: Segment,
    point: Point,
    kind: SegmentPointType,
) {
    let info = updated_segment_info(circuit.layout.segment_info(segment), point, kind);
    set_endpoints(circuit, segment, info.endpoints());
}

/// Setzt Punkttypen in zwei Phasen, damit der Kollisionsindex nie zwei
/// sichtbare Endpunkte am selben Punkt sieht.
fn update_point_types(
    circuit: &mut CircuitData,
    point: Point,
    updates: &[(Segment, SegmentPointType)],
) {
    for &(segment, _) in updates {
        set_point_type(circuit, segment, point, SegmentPointType::ShadowPoint);
    }
    for &(segment, kind) in updates {
        set_point_type(circuit, segment, point, kind);
    }
}

/// Endpunkte auf Ausgängen von Logikelementen werden Leitungseingänge.
pub fn set_wire_inputs_at_logicitem_outputs(circuit: &mut CircuitData, segment: Segment) {
    let info = circuit.layout.segment_info(segment);
    let mut endpoints = info.endpoints();
    let outputs = circuit.index.logicitem_outputs();

    if outputs.find(info.line.p0).is_some() {
        endpoints.p0_type = SegmentPointType::Input;
    }
    if outputs.find(info.line.p1).is_some() {
        endpoints.p1_type = SegmentPointType::Input;
    }
    set_endpoints(circuit, segment, endpoints);
}

/// Ordnet die Endpunkttypen am Punkt neu und verschmilzt gerade Fortsetzungen.
pub fn fix_and_merge_segments(circuit: &mut CircuitData, point: Point) {
    let segments = circuit.index.spatial_index().query_line_segments(point);
    let Some(first) = segments.first() else {
        return;
    };
    let wire_id = first.wire_id;
    assert!(
        segments.iter().all(|segment| segment.wire_id == wire_id),
        "Segmente bei {point} gehören zu verschiedenen Leitungen"
    );

    // durchgehende Linien zuerst
    let mut lines: Vec<(Segment, OrderedLine)> = segments
        .iter()
        .map(|segment| (*segment, circuit.layout.line(*segment)))
        .collect();
    lines.sort_by_key(|(_, line)| line.is_endpoint(point));

    match lines.as_slice() {
        [(segment, line)] => {
            if !line.is_endpoint(point) {
                return;
            }
            let kind = match circuit.layout.segment_info(*segment).point_type(point) {
                SegmentPointType::Input => SegmentPointType::Input,
                _ => SegmentPointType::Output,
            };
            update_point_types(circuit, point, &[(*segment, kind)]);
        }
        [(segment_0, line_0), (segment_1, line_1)] => {
            if !line_0.is_endpoint(point) {
                split_segment(circuit, *segment_0, line_0.to_offset(point), None);
                fix_and_merge_segments(circuit, point);
            } else if line_0.is_horizontal() == line_1.is_horizontal() {
                merge_segments(circuit, *segment_0, *segment_1);
            } else {
                update_point_types(
                    circuit,
                    point,
                    &[
                        (*segment_0, SegmentPointType::CornerPoint),
                        (*segment_1, SegmentPointType::ShadowPoint),
                    ],
                );
            }
        }
        [(segment_0, line_0), (segment_1, _), (segment_2, _)] => {
            if !line_0.is_endpoint(point) {
                split_segment(circuit, *segment_0, line_0.to_offset(point), None);
                fix_and_merge_segments(circuit, point);
                return;
            }
            update_point_types(
                circuit,
                point,
                &[
                    (*segment_0, SegmentPointType::CrossPoint),
                    (*segment_1, SegmentPointType::ShadowPoint),
                    (*segment_2, SegmentPointType::ShadowPoint),
                ],
            );
        }
        [(segment_0, _), (segment_1, _), (segment_2, _), (segment_3, _)] => {
            update_point_types(
                circuit,
                point,
                &[
                    (*segment_0, SegmentPointType::CrossPoint),
                    (*segment_1, SegmentPointType::ShadowPoint),
                    (*segment_2, SegmentPointType::ShadowPoint),
                    (*segment_3, SegmentPointType::ShadowPoint),
                ],
            );
        }
        other => panic!("unerwartete Anzahl von {} Segmenten bei {point}", other.len()),
    }
}

// ── Kollisionen ─────────────────────────────────────────────────────

/// Prüft Schleifen, mehrfach getriebene Netze und Anschlussorientierung.
fn wire_endpoints_colliding(circuit: &CircuitData, line: OrderedLine) -> bool {
    let collisions = circuit.index.collision_index();
    let wire_0 = collisions.first_wire(line.p0);
    let wire_1 = collisions.first_wire(line.p1);

    // beide Enden auf derselben Leitung ergeben eine Schleife
    if wire_0.is_some() && wire_0 == wire_1 {
        return true;
    }

    let mut input_count = [wire_0, wire_1]
        .into_iter()
        .flatten()
        .filter(|wire_id| circuit.layout.segment_tree(*wire_id).has_input())
        .count();

    let endpoints = [
        (line.p0, wire_0, line.orientation_p0()),
        (line.p1, wire_1, line.orientation_p1()),
    ];
    for (point, wire_id, orientation) in endpoints {
        if wire_id.is_some() {
            continue;
        }
        if let Some(output) = circuit.index.logicitem_outputs().find(point) {
            if !orientations_compatible(orientation, output.orientation) {
                return true;
            }
            input_count += 1;
        }
        if let Some(input) = circuit.index.logicitem_inputs().find(point) {
            if !orientations_compatible(orientation, input.orientation) {
                return true;
            }
        }
    }

    input_count > 1
}

pub fn is_wire_colliding(circuit: &CircuitData, line: OrderedLine) -> bool {
    wire_endpoints_colliding(circuit, line)
        || circuit.index.collision_index().is_colliding_line(line)
}

// ── Bäume ───────────────────────────────────────────────────────────

fn tree_infos(circuit: &CircuitData, wire_id: WireId) -> Vec<(SegmentIndex, SegmentInfo)> {
    circuit
        .layout
        .segment_tree(wire_id)
        .iter()
        .map(|(segment_index, info)| (segment_index, *info))
        .collect()
}

/// Verschiebt ein vollständiges Segment in einen anderen Baum.
fn move_segment_between_trees(
    circuit: &mut CircuitData,
    segment: Segment,
    destination: WireId,
) -> Segment {
    let source = segment.wire_id;
    assert_ne!(source, destination, "Quelle und Ziel sind identisch");
    let info = circuit.layout.segment_info(segment);

    if source.is_inserted() && !destination.is_inserted() {
        circuit.submit(InfoMessage::SegmentUninserted { segment, info });
    }

    let (source_tree, destination_tree) = circuit.layout.two_segment_trees_mut(source, destination);
    let last_index = source_tree.last_index();
    let new_index =
        destination_tree.copy_segment(source_tree, segment.segment_index, info.line.full_part());
    source_tree.swap_and_delete_segment(segment.segment_index);
    let new_segment = Segment::new(destination, new_index);

    circuit.submit(InfoMessage::SegmentIdUpdated {
        new_segment,
        old_segment: segment,
    });
    if source.is_inserted() && destination.is_inserted() {
        circuit.submit(InfoMessage::InsertedSegmentIdUpdated {
            new_segment,
            old_segment: segment,
            info,
        });
    } else if destination.is_inserted() {
        circuit.submit(InfoMessage::SegmentInserted {
            segment: new_segment,
            info,
        });
    }

    if last_index != segment.segment_index {
        let moved = Segment::new(source, last_index);
        circuit.submit(InfoMessage::SegmentIdUpdated {
            new_segment: segment,
            old_segment: moved,
        });
        if source.is_inserted() {
            let info = circuit.layout.segment_info(segment);
            circuit.submit(InfoMessage::InsertedSegmentIdUpdated {
                new_segment: segment,
                old_segment: moved,
                info,
            });
        }
    }

    new_segment
}

/// Löscht eine leere Leitung; die zuletzt stehende rückt auf ihre Id.
fn swap_and_delete_empty_wire(circuit: &mut CircuitData, wire_id: WireId) {
    let last_id = circuit.layout.swap_and_delete_wire(wire_id);
    if last_id == wire_id {
        return;
    }
    for (segment_index, info) in tree_infos(circuit, wire_id) {
        let new_segment = Segment::new(wire_id, segment_index);
        let old_segment = Segment::new(last_id, segment_index);
        circuit.submit(InfoMessage::SegmentIdUpdated {
            new_segment,
            old_segment,
        });
        circuit.submit(InfoMessage::InsertedSegmentIdUpdated {
            new_segment,
            old_segment,
            info,
        });
    }
}

/// Hängt `source` an `destination` an und löscht `source`.
fn merge_and_delete_tree(circuit: &mut CircuitData, destination: WireId, source: WireId) {
    assert!(
        destination < source && destination.is_inserted(),
        "{source} kann nicht in {destination} verschmolzen werden"
    );
    let offset = circuit.layout.segment_tree(destination).len();

    for (segment_index, info) in tree_infos(circuit, source) {
        let new_segment = Segment::new(
            destination,
            SegmentIndex::from_index(offset + segment_index.index()),
        );
        let old_segment = Segment::new(source, segment_index);
        circuit.submit(InfoMessage::SegmentIdUpdated {
            new_segment,
            old_segment,
        });
        circuit.submit(InfoMessage::InsertedSegmentIdUpdated {
            new_segment,
            old_segment,
            info,
        });
    }

    let (destination_tree, source_tree) =
        circuit.layout.two_segment_trees_mut(destination, source);
    destination_tree.add_tree(source_tree);
    source_tree.clear();

    swap_and_delete_empty_wire(circuit, source);
}

/// Verteilt die Zusammenhangskomponenten einer Leitung auf eigene Leitungen.
fn split_broken_tree(circuit: &mut CircuitData, wire_id: WireId) {
    let labels = circuit.layout.segment_tree(wire_id).connected_components();
    let component_count = labels.iter().max().map_or(0, |label| label + 1);
    if component_count <= 1 {
        return;
    }
    log::debug!("{wire_id} zerfällt in {component_count} Teile");

    let new_wires: Vec<WireId> = (1..component_count)
        .map(|_| circuit.layout.add_wire())
        .collect();

    // absteigend, damit nachrückende Segmente bereits bearbeitet sind
    for index in (0..labels.len()).rev() {
        let label = labels[index];
        if label != 0 {
            let segment = Segment::new(wire_id, SegmentIndex::from_index(index));
            move_segment_between_trees(circuit, segment, new_wires[label - 1]);
        }
    }
}

/// Findet die Leitung, an die eine neue Linie angeschlossen wird.
fn find_wire_for_inserting(circuit: &mut CircuitData, line: OrderedLine) -> WireId {
    let wire_at = |circuit: &CircuitData, point: Point| {
        circuit
            .index
            .spatial_index()
            .query_line_segments(point)
            .first()
            .map(|segment| segment.wire_id)
    };
    let wire_0 = wire_at(circuit, line.p0);
    let wire_1 = wire_at(circuit, line.p1);

    match (wire_0, wire_1) {
        (Some(wire_id), None) | (None, Some(wire_id)) => wire_id,
        (Some(a), Some(b)) if a == b => a,
        (Some(a), Some(b)) => {
            let destination = a.min(b);
            merge_and_delete_tree(circuit, destination, a.max(b));
            destination
        }
        (None, None) => circuit.layout.add_wire(),
    }
}

/// Fügt ein temporäres Segment in die passende Leitung ein.
pub fn insert_full_segment(circuit: &mut CircuitData, segment: Segment) -> Segment {
    assert!(
        segment.wire_id.is_temporary(),
        "nur temporäre Segmente können eingefügt werden"
    );
    let line = circuit.layout.line(segment);
    let key = circuit.keys.segment_key(segment);

    let destination = find_wire_for_inserting(circuit, line);
    circuit.push_history(HistoryEntry::SegmentUninsert { key });
    move_segment_between_trees(circuit, segment, destination)
}

/// Nimmt ein eingefügtes Segment heraus und teilt zerfallene Leitungen auf.
pub fn uninsert_full_segment(circuit: &mut CircuitData, segment: Segment) -> Segment {
    let source = segment.wire_id;
    assert!(source.is_inserted(), "{segment} ist nicht eingefügt");
    assert!(
        circuit
            .layout
            .segment_tree(source)
            .valid_parts(segment.segment_index)
            .is_empty(),
        "{segment} ist noch als gültig markiert"
    );

    let key = circuit.keys.segment_key(segment);
    circuit.push_history(HistoryEntry::SegmentInsert { key });
    let new_segment = move_segment_between_trees(circuit, segment, WireId::TEMPORARY);

    if circuit.layout.segment_tree(source).is_empty() {
        swap_and_delete_empty_wire(circuit, source);
    } else {
        split_broken_tree(circuit, source);
    }
    new_segment
}

pub fn to_colliding_tree(circuit: &mut CircuitData, segment: Segment) -> Segment {
    assert!(segment.wire_id.is_temporary(), "{segment} ist nicht temporär");
    let key = circuit.keys.segment_key(segment);
    circuit.push_history(HistoryEntry::SegmentToTemporaryTree { key });
    move_segment_between_trees(circuit, segment, WireId::COLLIDING)
}

pub fn to_temporary_tree(circuit: &mut CircuitData, segment: Segment) -> Segment {
    assert!(segment.wire_id.is_colliding(), "{segment} kollidiert nicht");
    let key = circuit.keys.segment_key(segment);
    circuit.push_history(HistoryEntry::SegmentToCollidingTree { key });
    move_segment_between_trees(circuit, segment, WireId::TEMPORARY)
}

// ── Gültigkeitsmarkierung ───────────────────────────────────────────

fn changed_parts(circuit: &CircuitData, segment_part: SegmentPart, valid: bool) -> Vec<Part> {
    let segment = segment_part.segment;
    let mut parts = Vec::new();
    iter_parts_partial(
        segment_part.part,
        circuit
            .layout
            .segment_tree(segment.wire_id)
            .valid_parts(segment.segment_index),
        |part, selected| {
            if selected == valid {
                parts.push(part);
            }
        },
    );
    parts
}

pub fn mark_valid(circuit: &mut CircuitData, segment_part: SegmentPart) {
    let segment = segment_part.segment;
    assert!(segment.wire_id.is_inserted(), "{segment} ist nicht eingefügt");

    let key = circuit.keys.segment_key(segment);
    for part in changed_parts(circuit, segment_part, false) {
        circuit.push_history(HistoryEntry::SegmentUnmarkValid { key, part });
    }
    circuit
        .layout
        .segment_tree_mut(segment.wire_id)
        .mark_valid(segment.segment_index, segment_part.part);
}

pub fn unmark_valid(circuit: &mut CircuitData, segment_part: SegmentPart) {
    let segment = segment_part.segment;
    assert!(segment.wire_id.is_inserted(), "{segment} ist nicht eingefügt");

    let key = circuit.keys.segment_key(segment);
    for part in changed_parts(circuit, segment_part, true) {
        circuit.push_history(HistoryEntry::SegmentMarkValid { key, part });
    }
    circuit
        .layout
        .segment_tree_mut(segment.wire_id)
        .unmark_valid(segment.segment_index, segment_part.part);
}

// ── Sichtbare Selektion ─────────────────────────────────────────────

pub fn add_segment_to_visible_selection(circuit: &mut CircuitData, segment_part: SegmentPart) {
    let key = circuit.keys.segment_key(segment_part.segment);
    let missing: Vec<Part> = match circuit
        .visible_selection
        .initial_selection()
        .segment_parts(segment_part.segment)
    {
        Some(parts) => {
            let mut missing = Vec::new();
            iter_parts_partial(segment_part.part, parts, |part, selected| {
                if !selected {
                    missing.push(part);
                }
            });
            missing
        }
        None => vec![segment_part.part],
    };
    for part in missing {
        circuit.push_history(HistoryEntry::SegmentRemoveVisibleSelection { key, part });
    }
    circuit
        .visible_selection
        .initial_selection_mut()
        .add_segment(segment_part);
}

pub fn remove_segment_from_visible_selection(
    circuit: &mut CircuitData,
    segment_part: SegmentPart,
) {
    let key = circuit.keys.segment_key(segment_part.segment);
    let present: Vec<Part> = match circuit
        .visible_selection
        .initial_selection()
        .segment_parts(segment_part.segment)
    {
        Some(parts) => {
            let mut present = Vec::new();
            iter_parts_partial(segment_part.part, parts, |part, selected| {
                if selected {
                    present.push(part);
                }
            });
            present
        }
        None => Vec::new(),
    };
    for part in present {
        circuit.push_history(HistoryEntry::SegmentAddVisibleSelection { key, part });
    }
    circuit
        .visible_selection
        .initial_selection_mut()
        .remove_segment(segment_part);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: i16, y0: i16, x1: i16, y1: i16) -> OrderedLine {
        OrderedLine::from_points(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn split_and_merge_keeps_key() {
        let mut circuit = CircuitData::new();
        let segment = add_temporary_segment(&mut circuit, line(0, 0, 10, 0), Endpoints::SHADOW, None);
        let key = circuit.keys.segment_key(segment);

        let right = split_segment(&mut circuit, segment, Offset(4), None);
        assert_eq!(circuit.layout.line(segment), line(0, 0, 4, 0));
        assert_eq!(circuit.layout.line(right), line(4, 0, 10, 0));

        let merged = merge_segments(&mut circuit, right, segment);
        assert_eq!(circuit.layout.line(merged), line(0, 0, 10, 0));
        assert_eq!(circuit.keys.segment_key(merged), key);
        assert_eq!(circuit.layout.segment_tree(WireId::TEMPORARY).len(), 1);
    }

    #[test]
    fn isolate_middle_part() {
        let mut circuit = CircuitData::new();
        let segment = add_temporary_segment(&mut circuit, line(0, 0, 10, 0), Endpoints::SHADOW, None);

        let middle = isolate_part(
            &mut circuit,
            SegmentPart {
                segment,
                part: Part::new(3, 7),
            },
        );
        assert_eq!(circuit.layout.line(middle), line(3, 0, 7, 0));
        assert_eq!(circuit.layout.segment_tree(WireId::TEMPORARY).len(), 3);
    }

    #[test]
    fn inserting_corner_sets_point_types() {
        let mut circuit = CircuitData::new();
        for l in [line(0, 0, 5, 0), line(5, 0, 5, 5)] {
            let segment = add_temporary_segment(&mut circuit, l, Endpoints::SHADOW, None);
            insert_full_segment(&mut circuit, segment);
            fix_and_merge_segments(&mut circuit, l.p0);
            fix_and_merge_segments(&mut circuit, l.p1);
        }

        assert_eq!(circuit.layout.wire_count(), 3);
        assert!(circuit
            .index
            .collision_index()
            .query(Point::new(5, 0))
            .is_wire_corner_point());
        assert!(circuit.keys.is_consistent(&circuit.layout));
    }

    #[test]
    fn uninsert_splits_broken_wire() {
        let mut circuit = CircuitData::new();
        let lines = [line(0, 0, 5, 0), line(5, 0, 10, 0), line(10, 0, 15, 0)];
        let mut segments = Vec::new();
        for l in lines {
            let segment = add_temporary_segment(&mut circuit, l, Endpoints::SHADOW, None);
            segments.push(insert_full_segment(&mut circuit, segment));
        }
        assert_eq!(circuit.layout.inserted_wire_ids().count(), 1);

        let middle = circuit.index.spatial_index().query_line_segments(Point::new(7, 0));
        let middle = *middle.first().expect("Segment erwartet");
        uninsert_full_segment(&mut circuit, middle);

        assert_eq!(circuit.layout.inserted_wire_ids().count(), 2);
        assert_eq!(circuit.layout.segment_tree(WireId::TEMPORARY).len(), 1);
        assert!(circuit.index.same_content(&crate::core::LayoutIndex::from_layout(&circuit.layout)));
    }

    #[test]
    fn mark_valid_records_only_changes() {
        let mut circuit = CircuitData::new();
        let segment = add_temporary_segment(&mut circuit, line(0, 0, 10, 0), Endpoints::SHADOW, None);
        let segment = insert_full_segment(&mut circuit, segment);
        circuit.history.enable();

        mark_valid(&mut circuit, SegmentPart { segment, part: Part::new(0, 4) });
        mark_valid(&mut circuit, SegmentPart { segment, part: Part::new(2, 6) });

        let key = circuit.keys.segment_key(segment);
        assert_eq!(
            circuit.history.undo_stack().top(),
            Some(&HistoryEntry::SegmentUnmarkValid {
                key,
                part: Part::new(4, 6),
            })
        );
    }
}
