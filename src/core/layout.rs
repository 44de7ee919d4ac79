//! Kanonische Speicherung aller Elemente: Logikelemente, Dekorationen, Segmentbäume.
//!
//! Das Layout kennt keine Indizes und verschickt keine Nachrichten; das
//! übernehmen die Editieroperationen.

use serde::{Deserialize, Serialize};

use super::decoration::{Decoration, DecorationDefinition};
use super::geometry::{OrderedLine, Part};
use super::grid::Point;
use super::ids::{DecorationId, LogicItemId, Segment, SegmentPart, WireId};
use super::logicitem::{ConnectionKind, ConnectionRef, DisplayState, LogicItem, LogicItemDefinition};
use super::segment_tree::{SegmentInfo, SegmentTree};

/// Container für alle Schaltungselemente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    logicitems: Vec<LogicItem>,
    decorations: Vec<Decoration>,
    /// Index 0 temporär, Index 1 kollidierend, ab 2 eingefügte Bäume.
    wires: Vec<SegmentTree>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            logicitems: Vec::new(),
            decorations: Vec::new(),
            wires: vec![SegmentTree::new(), SegmentTree::new()],
        }
    }
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.logicitems.is_empty()
            && self.decorations.is_empty()
            && self.wires.iter().all(SegmentTree::is_empty)
    }

    // ── Logikelemente ───────────────────────────────────────────────

    pub fn logicitem_count(&self) -> usize {
        self.logicitems.len()
    }

    pub fn logicitem_ids(&self) -> impl DoubleEndedIterator<Item = LogicItemId> {
        (0..self.logicitems.len()).map(LogicItemId::from_index)
    }

    pub fn logicitem(&self, id: LogicItemId) -> &LogicItem {
        &self.logicitems[id.index()]
    }

    pub fn logicitems(&self) -> impl Iterator<Item = (LogicItemId, &LogicItem)> {
        self.logicitems
            .iter()
            .enumerate()
            .map(|(index, item)| (LogicItemId::from_index(index), item))
    }

    pub fn is_valid_logicitem(&self, id: LogicItemId) -> bool {
        id.index() < self.logicitems.len()
    }

    pub fn add_logicitem(
        &mut self,
        definition: LogicItemDefinition,
        position: Point,
        display_state: DisplayState,
    ) -> LogicItemId {
        assert!(definition.is_valid(), "ungültige Definition {definition:?}");
        self.logicitems.push(LogicItem {
            definition,
            position,
            display_state,
        });
        LogicItemId::from_index(self.logicitems.len() - 1)
    }

    /// Löscht ein Element, das letzte rückt nach. Liefert die alte Id des verschobenen.
    pub fn swap_and_delete_logicitem(&mut self, id: LogicItemId) -> LogicItemId {
        let last = LogicItemId::from_index(self.logicitems.len() - 1);
        self.logicitems.swap_remove(id.index());
        last
    }

    pub fn set_logicitem_position(&mut self, id: LogicItemId, position: Point) {
        self.logicitems[id.index()].position = position;
    }

    pub fn set_logicitem_display_state(&mut self, id: LogicItemId, state: DisplayState) {
        self.logicitems[id.index()].display_state = state;
    }

    /// Kippt den Inverter eines Anschlusses.
    pub fn toggle_inverter(&mut self, id: LogicItemId, connection: ConnectionRef) {
        let definition = &mut self.logicitems[id.index()].definition;
        let flags = match connection.kind {
            ConnectionKind::Input => &mut definition.input_inverters,
            ConnectionKind::Output => &mut definition.output_inverters,
        };
        flags[connection.connection_id] = !flags[connection.connection_id];
    }

    // ── Dekorationen ────────────────────────────────────────────────

    pub fn decoration_count(&self) -> usize {
        self.decorations.len()
    }

    pub fn decoration_ids(&self) -> impl DoubleEndedIterator<Item = DecorationId> {
        (0..self.decorations.len()).map(DecorationId::from_index)
    }

    pub fn decoration(&self, id: DecorationId) -> &Decoration {
        &self.decorations[id.index()]
    }

    pub fn decorations(&self) -> impl Iterator<Item = (DecorationId, &Decoration)> {
        self.decorations
            .iter()
            .enumerate()
            .map(|(index, item)| (DecorationId::from_index(index), item))
    }

    pub fn is_valid_decoration(&self, id: DecorationId) -> bool {
        id.index() < self.decorations.len()
    }

    pub fn add_decoration(
        &mut self,
        definition: DecorationDefinition,
        position: Point,
        display_state: DisplayState,
    ) -> DecorationId {
        self.decorations.push(Decoration {
            definition,
            position,
            display_state,
        });
        DecorationId::from_index(self.decorations.len() - 1)
    }

    pub fn swap_and_delete_decoration(&mut self, id: DecorationId) -> DecorationId {
        let last = DecorationId::from_index(self.decorations.len() - 1);
        self.decorations.swap_remove(id.index());
        last
    }

    pub fn set_decoration_position(&mut self, id: DecorationId, position: Point) {
        self.decorations[id.index()].position = position;
    }

    pub fn set_decoration_display_state(&mut self, id: DecorationId, state: DisplayState) {
        self.decorations[id.index()].display_state = state;
    }

    pub fn set_decoration_text(&mut self, id: DecorationId, text: String) {
        self.decorations[id.index()].definition.text = text;
    }

    // ── Leitungen ───────────────────────────────────────────────────

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    pub fn wire_ids(&self) -> impl DoubleEndedIterator<Item = WireId> {
        (0..self.wires.len()).map(WireId::from_index)
    }

    /// Nur die eingefügten Bäume.
    pub fn inserted_wire_ids(&self) -> impl DoubleEndedIterator<Item = WireId> {
        (WireId::FIRST_INSERTED.index()..self.wires.len()).map(WireId::from_index)
    }

    pub fn segment_tree(&self, wire_id: WireId) -> &SegmentTree {
        &self.wires[wire_id.index()]
    }

    pub fn segment_tree_mut(&mut self, wire_id: WireId) -> &mut SegmentTree {
        &mut self.wires[wire_id.index()]
    }

    /// Zwei verschiedene Bäume gleichzeitig veränderbar.
    pub fn two_segment_trees_mut(
        &mut self,
        a: WireId,
        b: WireId,
    ) -> (&mut SegmentTree, &mut SegmentTree) {
        assert_ne!(a, b, "Bäume müssen verschieden sein");
        if a < b {
            let (low, high) = self.wires.split_at_mut(b.index());
            (&mut low[a.index()], &mut high[0])
        } else {
            let (low, high) = self.wires.split_at_mut(a.index());
            (&mut high[0], &mut low[b.index()])
        }
    }

    pub fn add_wire(&mut self) -> WireId {
        self.wires.push(SegmentTree::new());
        WireId::from_index(self.wires.len() - 1)
    }

    /// Löscht einen leeren, eingefügten Baum. Liefert die alte Id des nachgerückten.
    pub fn swap_and_delete_wire(&mut self, wire_id: WireId) -> WireId {
        assert!(wire_id.is_inserted(), "nur eingefügte Bäume sind löschbar");
        assert!(
            self.segment_tree(wire_id).is_empty(),
            "nur leere Bäume sind löschbar"
        );
        let last = WireId::from_index(self.wires.len() - 1);
        self.wires.swap_remove(wire_id.index());
        last
    }

    pub fn is_valid_segment(&self, segment: Segment) -> bool {
        segment.wire_id.index() < self.wires.len()
            && segment.segment_index.index() < self.segment_tree(segment.wire_id).len()
    }

    pub fn segment_info(&self, segment: Segment) -> SegmentInfo {
        *self
            .segment_tree(segment.wire_id)
            .info(segment.segment_index)
    }

    pub fn line(&self, segment: Segment) -> OrderedLine {
        self.segment_tree(segment.wire_id)
            .line(segment.segment_index)
    }

    pub fn part_line(&self, segment_part: SegmentPart) -> OrderedLine {
        self.line(segment_part.segment).sub_line(segment_part.part)
    }

    pub fn full_part(&self, segment: Segment) -> Part {
        self.line(segment).full_part()
    }

    pub fn is_full_segment(&self, segment_part: SegmentPart) -> bool {
        self.full_part(segment_part.segment) == segment_part.part
    }

    /// Anzahl Segmente über alle Bäume.
    pub fn segment_count(&self) -> usize {
        self.wires.iter().map(SegmentTree::len).sum()
    }

    /// Alle Segmente aller Bäume.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.wire_ids().flat_map(move |wire_id| {
            self.segment_tree(wire_id)
                .indices()
                .map(move |segment_index| Segment::new(wire_id, segment_index))
        })
    }

    /// Anzeigezustand eines Teilbereichs, der vollständig in einem Zustand liegt.
    pub fn segment_display_states(&self, segment_part: SegmentPart) -> (DisplayState, DisplayState) {
        let wire_id = segment_part.segment.wire_id;
        if wire_id.is_temporary() {
            return (DisplayState::Temporary, DisplayState::Temporary);
        }
        if wire_id.is_colliding() {
            return (DisplayState::Colliding, DisplayState::Colliding);
        }

        let valid = self
            .segment_tree(wire_id)
            .valid_parts(segment_part.segment.segment_index);
        let part = segment_part.part;

        let mut has_valid = false;
        let mut has_normal = false;
        super::part_selection::iter_parts_partial(part, valid, |_, selected| {
            if selected {
                has_valid = true;
            } else {
                has_normal = true;
            }
        });

        match (has_valid, has_normal) {
            (true, true) => (DisplayState::Valid, DisplayState::Normal),
            (true, false) => (DisplayState::Valid, DisplayState::Valid),
            _ => (DisplayState::Normal, DisplayState::Normal),
        }
    }
}
