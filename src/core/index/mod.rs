//! Abgeleitete Indizes über den eingefügten Elementen eines Layouts.
//!
//! Alle Indizes werden ausschließlich über `submit` mit [`InfoMessage`]s
//! aktualisiert. `from_layout` erzeugt denselben Zustand durch einen
//! vollständigen Durchlauf und dient als Referenz für die Validierung.

pub mod collision_index;
pub mod connection_index;
pub mod key_index;
pub mod spatial_index;

pub use collision_index::{CollisionData, CollisionIndex, ItemType};
pub use connection_index::{
    LogicItemConnection, LogicItemConnectionIndex, WireConnection, WireConnectionIndex,
};
pub use key_index::KeyIndex;
pub use spatial_index::{SpatialElement, SpatialIndex};

use super::ids::Segment;
use super::layout::Layout;
use super::logicitem::ConnectionKind;
use super::message::InfoMessage;

/// Aggregat der sechs Positions-Indizes.
#[derive(Debug, Clone)]
pub struct LayoutIndex {
    logicitem_inputs: LogicItemConnectionIndex,
    logicitem_outputs: LogicItemConnectionIndex,
    wire_inputs: WireConnectionIndex,
    wire_outputs: WireConnectionIndex,
    collision_index: CollisionIndex,
    spatial_index: SpatialIndex,
}

impl Default for LayoutIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutIndex {
    pub fn new() -> Self {
        Self {
            logicitem_inputs: LogicItemConnectionIndex::new(ConnectionKind::Input),
            logicitem_outputs: LogicItemConnectionIndex::new(ConnectionKind::Output),
            wire_inputs: WireConnectionIndex::new(ConnectionKind::Input),
            wire_outputs: WireConnectionIndex::new(ConnectionKind::Output),
            collision_index: CollisionIndex::new(),
            spatial_index: SpatialIndex::new(),
        }
    }

    /// Baut alle Indizes aus dem aktuellen Layout neu auf.
    pub fn from_layout(layout: &Layout) -> Self {
        let mut index = Self::new();
        for message in inserted_messages(layout) {
            index.submit(&message);
        }
        index
    }

    pub fn submit(&mut self, message: &InfoMessage) {
        self.logicitem_inputs.submit(message);
        self.logicitem_outputs.submit(message);
        self.wire_inputs.submit(message);
        self.wire_outputs.submit(message);
        self.collision_index.submit(message);
        self.spatial_index.submit(message);
    }

    pub fn logicitem_inputs(&self) -> &LogicItemConnectionIndex {
        &self.logicitem_inputs
    }

    pub fn logicitem_outputs(&self) -> &LogicItemConnectionIndex {
        &self.logicitem_outputs
    }

    pub fn wire_inputs(&self) -> &WireConnectionIndex {
        &self.wire_inputs
    }

    pub fn wire_outputs(&self) -> &WireConnectionIndex {
        &self.wire_outputs
    }

    pub fn collision_index(&self) -> &CollisionIndex {
        &self.collision_index
    }

    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.spatial_index
    }

    /// Vergleicht den Inhalt, unabhängig vom internen Aufbau des KD-Trees.
    pub fn same_content(&self, other: &LayoutIndex) -> bool {
        self.logicitem_inputs == other.logicitem_inputs
            && self.logicitem_outputs == other.logicitem_outputs
            && self.wire_inputs == other.wire_inputs
            && self.wire_outputs == other.wire_outputs
            && self.collision_index == other.collision_index
            && self.spatial_index.entries() == other.spatial_index.entries()
    }
}

/// Nachrichten, die alle eingefügten Elemente eines Layouts beschreiben.
pub fn inserted_messages(layout: &Layout) -> Vec<InfoMessage> {
    let mut messages = Vec::new();

    for (logicitem_id, logicitem) in layout.logicitems() {
        if logicitem.display_state.is_inserted() {
            messages.push(InfoMessage::LogicItemInserted {
                logicitem_id,
                data: logicitem.data(),
            });
        }
    }
    for (decoration_id, decoration) in layout.decorations() {
        if decoration.display_state.is_inserted() {
            messages.push(InfoMessage::DecorationInserted {
                decoration_id,
                data: decoration.data(),
            });
        }
    }
    for wire_id in layout.inserted_wire_ids() {
        for (segment_index, info) in layout.segment_tree(wire_id).iter() {
            messages.push(InfoMessage::SegmentInserted {
                segment: Segment::new(wire_id, segment_index),
                info: *info,
            });
        }
    }

    messages
}
