//! Normalisierte, reihenfolgeunabhängige Beschreibung eines Layouts.
//!
//! Elemente werden über ihre stabilen Schlüssel beschrieben, nicht über Ids.
//! Zwei Zustände sind gleich, wenn sie dieselben Elemente mit denselben
//! Schlüsseln, derselben Geometrie und denselben Anzeigezuständen enthalten.

use crate::core::part_selection::iter_parts_partial;
use crate::core::{
    DecorationDefinition, DecorationKey, DisplayState, Endpoints, KeyIndex, Layout,
    LogicItemDefinition, LogicItemKey, OrderedLine, Part, Point, Segment, SegmentKey,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicItemKeyState {
    pub key: LogicItemKey,
    pub definition: LogicItemDefinition,
    pub position: Point,
    pub display_state: DisplayState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationKeyState {
    pub key: DecorationKey,
    pub definition: DecorationDefinition,
    pub position: Point,
    pub display_state: DisplayState,
}

/// Segment mit Geometrie und Anzeigezustand je Teilbereich.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStateEntry {
    pub key: SegmentKey,
    pub line: OrderedLine,
    pub endpoints: Endpoints,
    pub display_states: Vec<(Part, DisplayState)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutKeyState {
    pub logicitems: Vec<LogicItemKeyState>,
    pub decorations: Vec<DecorationKeyState>,
    pub segments: Vec<KeyStateEntry>,
    /// Segmentschlüssel je eingefügter Leitung, sortiert.
    pub wires: Vec<Vec<SegmentKey>>,
}

impl LayoutKeyState {
    pub fn from_layout(layout: &Layout, keys: &KeyIndex) -> Self {
        let mut logicitems: Vec<LogicItemKeyState> = layout
            .logicitems()
            .map(|(logicitem_id, logicitem)| LogicItemKeyState {
                key: keys.logicitem_key(logicitem_id),
                definition: logicitem.definition.clone(),
                position: logicitem.position,
                display_state: logicitem.display_state,
            })
            .collect();
        logicitems.sort_by_key(|entry| entry.key);

        let mut decorations: Vec<DecorationKeyState> = layout
            .decorations()
            .map(|(decoration_id, decoration)| DecorationKeyState {
                key: keys.decoration_key(decoration_id),
                definition: decoration.definition.clone(),
                position: decoration.position,
                display_state: decoration.display_state,
            })
            .collect();
        decorations.sort_by_key(|entry| entry.key);

        let mut segments = Vec::new();
        let mut wires = Vec::new();
        for wire_id in layout.wire_ids() {
            let tree = layout.segment_tree(wire_id);
            let mut wire_keys = Vec::new();

            for (segment_index, info) in tree.iter() {
                let segment = Segment::new(wire_id, segment_index);
                let key = keys.segment_key(segment);
                wire_keys.push(key);

                let display_states = if wire_id.is_temporary() {
                    vec![(info.line.full_part(), DisplayState::Temporary)]
                } else if wire_id.is_colliding() {
                    vec![(info.line.full_part(), DisplayState::Colliding)]
                } else {
                    let mut states = Vec::new();
                    iter_parts_partial(
                        info.line.full_part(),
                        tree.valid_parts(segment_index),
                        |part, valid| {
                            let state = if valid {
                                DisplayState::Valid
                            } else {
                                DisplayState::Normal
                            };
                            states.push((part, state));
                        },
                    );
                    states
                };

                segments.push(KeyStateEntry {
                    key,
                    line: info.line,
                    endpoints: info.endpoints(),
                    display_states,
                });
            }

            if wire_id.is_inserted() {
                wire_keys.sort();
                wires.push(wire_keys);
            }
        }
        segments.sort_by_key(|entry| entry.key);
        wires.sort();

        Self {
            logicitems,
            decorations,
            segments,
            wires,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SegmentIndex, SegmentInfo, WireId};

    #[test]
    fn state_ignores_wire_numbering() {
        let line_a = OrderedLine::from_points(Point::new(0, 0), Point::new(5, 0));
        let line_b = OrderedLine::from_points(Point::new(0, 5), Point::new(5, 5));

        let mut first = Layout::new();
        for line in [line_a, line_b] {
            let wire_id = first.add_wire();
            first.segment_tree_mut(wire_id).add_segment(SegmentInfo::shadow(line));
        }
        let keys_first = KeyIndex::from_layout(&first);

        let mut second = Layout::new();
        for line in [line_b, line_a] {
            let wire_id = second.add_wire();
            second.segment_tree_mut(wire_id).add_segment(SegmentInfo::shadow(line));
        }
        let mut keys_second = KeyIndex::from_layout(&second);
        keys_second.swap_segment_keys(
            Segment::new(WireId::FIRST_INSERTED, SegmentIndex(0)),
            Segment::new(WireId(WireId::FIRST_INSERTED.0 + 1), SegmentIndex(0)),
        );

        assert_eq!(
            LayoutKeyState::from_layout(&first, &keys_first),
            LayoutKeyState::from_layout(&second, &keys_second)
        );
    }
}
