//! Selektion: Menge von Logikelementen, Dekorationen und Segment-Teilbereichen.
//!
//! Über [`Selection::submit`] bleibt eine Selektion gültig, während sich Ids
//! durch Löschen, Teilen und Verschmelzen ändern.

use indexmap::{IndexMap, IndexSet};

use super::geometry::Part;
use super::ids::{DecorationId, LogicItemId, Segment, SegmentPart};
use super::layout::Layout;
use super::message::InfoMessage;
use super::part_selection::{PartCopyDefinition, PartSelection};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    logicitems: IndexSet<LogicItemId>,
    decorations: IndexSet<DecorationId>,
    segments: IndexMap<Segment, PartSelection>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.logicitems.is_empty() && self.decorations.is_empty() && self.segments.is_empty()
    }

    pub fn clear(&mut self) {
        self.logicitems.clear();
        self.decorations.clear();
        self.segments.clear();
    }

    // ── Logikelemente ───────────────────────────────────────────────

    pub fn add_logicitem(&mut self, id: LogicItemId) {
        self.logicitems.insert(id);
    }

    pub fn remove_logicitem(&mut self, id: LogicItemId) {
        self.logicitems.shift_remove(&id);
    }

    pub fn toggle_logicitem(&mut self, id: LogicItemId) {
        if !self.logicitems.shift_remove(&id) {
            self.logicitems.insert(id);
        }
    }

    pub fn is_selected_logicitem(&self, id: LogicItemId) -> bool {
        self.logicitems.contains(&id)
    }

    pub fn selected_logicitems(&self) -> impl Iterator<Item = LogicItemId> + '_ {
        self.logicitems.iter().copied()
    }

    pub fn pop_logicitem(&mut self) -> Option<LogicItemId> {
        self.logicitems.shift_remove_index(0)
    }

    // ── Dekorationen ────────────────────────────────────────────────

    pub fn add_decoration(&mut self, id: DecorationId) {
        self.decorations.insert(id);
    }

    pub fn remove_decoration(&mut self, id: DecorationId) {
        self.decorations.shift_remove(&id);
    }

    pub fn toggle_decoration(&mut self, id: DecorationId) {
        if !self.decorations.shift_remove(&id) {
            self.decorations.insert(id);
        }
    }

    pub fn is_selected_decoration(&self, id: DecorationId) -> bool {
        self.decorations.contains(&id)
    }

    pub fn selected_decorations(&self) -> impl Iterator<Item = DecorationId> + '_ {
        self.decorations.iter().copied()
    }

    pub fn pop_decoration(&mut self) -> Option<DecorationId> {
        self.decorations.shift_remove_index(0)
    }

    // ── Segmente ────────────────────────────────────────────────────

    pub fn add_segment(&mut self, segment_part: SegmentPart) {
        self.segments
            .entry(segment_part.segment)
            .or_default()
            .add_part(segment_part.part);
    }

    pub fn remove_segment(&mut self, segment_part: SegmentPart) {
        if let Some(parts) = self.segments.get_mut(&segment_part.segment) {
            parts.remove_part(segment_part.part);
            if parts.is_empty() {
                self.segments.shift_remove(&segment_part.segment);
            }
        }
    }

    pub fn toggle_segment(&mut self, segment_part: SegmentPart) {
        if self.is_selected_segment_part(segment_part) {
            self.remove_segment(segment_part);
        } else {
            self.add_segment(segment_part);
        }
    }

    /// Ersetzt alle ausgewählten Bereiche eines Segments.
    pub fn set_segment_parts(&mut self, segment: Segment, parts: PartSelection) {
        if parts.is_empty() {
            self.segments.shift_remove(&segment);
        } else {
            self.segments.insert(segment, parts);
        }
    }

    pub fn segment_parts(&self, segment: Segment) -> Option<&PartSelection> {
        self.segments.get(&segment)
    }

    pub fn is_selected_segment(&self, segment: Segment) -> bool {
        self.segments.contains_key(&segment)
    }

    pub fn is_selected_segment_part(&self, segment_part: SegmentPart) -> bool {
        self.segments
            .get(&segment_part.segment)
            .is_some_and(|parts| parts.contains(segment_part.part))
    }

    pub fn selected_segments(&self) -> impl Iterator<Item = (Segment, &PartSelection)> {
        self.segments.iter().map(|(segment, parts)| (*segment, parts))
    }

    /// Alle ausgewählten Teilbereiche einzeln.
    pub fn selected_segment_parts(&self) -> Vec<SegmentPart> {
        self.segments
            .iter()
            .flat_map(|(segment, parts)| {
                parts.iter().map(move |part| SegmentPart {
                    segment: *segment,
                    part,
                })
            })
            .collect()
    }

    /// Entnimmt den ersten Teilbereich.
    pub fn pop_segment_part(&mut self) -> Option<SegmentPart> {
        let (segment, parts) = self.segments.first()?;
        let segment = *segment;
        let part = parts.first()?;
        let segment_part = SegmentPart { segment, part };
        self.remove_segment(segment_part);
        Some(segment_part)
    }

    // ── Nachrichten ─────────────────────────────────────────────────

    /// Hält die Selektion über Id-Änderungen und Löschungen hinweg gültig.
    pub fn submit(&mut self, message: &InfoMessage) {
        match message {
            InfoMessage::LogicItemDeleted { logicitem_id } => {
                self.logicitems.shift_remove(logicitem_id);
            }
            InfoMessage::LogicItemIdUpdated {
                new_logicitem_id,
                old_logicitem_id,
            } => {
                if let Some(index) = self.logicitems.get_index_of(old_logicitem_id) {
                    self.logicitems.shift_remove_index(index);
                    self.logicitems.shift_insert(index, *new_logicitem_id);
                }
            }

            InfoMessage::DecorationDeleted { decoration_id } => {
                self.decorations.shift_remove(decoration_id);
            }
            InfoMessage::DecorationIdUpdated {
                new_decoration_id,
                old_decoration_id,
            } => {
                if let Some(index) = self.decorations.get_index_of(old_decoration_id) {
                    self.decorations.shift_remove_index(index);
                    self.decorations.shift_insert(index, *new_decoration_id);
                }
            }

            InfoMessage::SegmentIdUpdated {
                new_segment,
                old_segment,
            } => {
                if let Some(parts) = self.segments.shift_remove(old_segment) {
                    self.segments.insert(*new_segment, parts);
                }
            }
            InfoMessage::SegmentPartMoved {
                destination,
                source,
                ..
            } => self.handle_part_moved(*destination, *source),
            InfoMessage::SegmentPartDeleted {
                segment_part,
                delete_segment,
            } => {
                if *delete_segment {
                    self.segments.shift_remove(&segment_part.segment);
                } else {
                    self.remove_segment(*segment_part);
                }
            }

            _ => {}
        }
    }

    fn handle_part_moved(&mut self, destination: SegmentPart, source: SegmentPart) {
        let definition = PartCopyDefinition::new(destination.part, source.part);

        if destination.segment == source.segment {
            if let Some(parts) = self.segments.get_mut(&source.segment) {
                parts.move_parts_within(definition);
                if parts.is_empty() {
                    self.segments.shift_remove(&source.segment);
                }
            }
            return;
        }

        let Some(source_parts) = self.segments.get_mut(&source.segment) else {
            return;
        };
        if !source_parts.overlaps(source.part) {
            return;
        }

        let mut destination_parts = PartSelection::new();
        source_parts.move_parts_to(&mut destination_parts, definition);
        if source_parts.is_empty() {
            self.segments.shift_remove(&source.segment);
        }

        let entry = self.segments.entry(destination.segment).or_default();
        for part in destination_parts.iter() {
            entry.add_part(part);
        }
    }

    // ── Validierung ─────────────────────────────────────────────────

    /// Verweist jeder Eintrag auf ein existierendes Element?
    pub fn is_valid(&self, layout: &Layout) -> bool {
        self.logicitems
            .iter()
            .all(|id| layout.is_valid_logicitem(*id))
            && self
                .decorations
                .iter()
                .all(|id| layout.is_valid_decoration(*id))
            && self.segments.iter().all(|(segment, parts)| {
                layout.is_valid_segment(*segment)
                    && !parts.is_empty()
                    && parts.max_offset() <= layout.full_part(*segment).end
            })
    }
}

/// Selektion mit genau einem Teilbereich.
pub fn selection_of_part(segment: Segment, part: Part) -> Selection {
    let mut selection = Selection::new();
    selection.add_segment(SegmentPart { segment, part });
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Offset;
    use crate::core::ids::{SegmentIndex, WireId};

    fn segment(wire: u32, index: u32) -> Segment {
        Segment::new(WireId(wire), SegmentIndex(index))
    }

    #[test]
    fn logicitem_messages_remap_and_prune() {
        let mut selection = Selection::new();
        selection.add_logicitem(LogicItemId(0));
        selection.add_logicitem(LogicItemId(3));

        selection.submit(&InfoMessage::LogicItemDeleted {
            logicitem_id: LogicItemId(0),
        });
        selection.submit(&InfoMessage::LogicItemIdUpdated {
            new_logicitem_id: LogicItemId(0),
            old_logicitem_id: LogicItemId(3),
        });

        assert!(selection.is_selected_logicitem(LogicItemId(0)));
        assert!(!selection.is_selected_logicitem(LogicItemId(3)));
        assert_eq!(selection.selected_logicitems().count(), 1);
    }

    #[test]
    fn split_moves_selected_parts() {
        let mut selection = selection_of_part(segment(0, 0), Part::new(2, 8));

        // Segment [0, 10) wird bei 5 geteilt, rechter Teil wird Segment 1
        selection.submit(&InfoMessage::SegmentPartMoved {
            destination: SegmentPart {
                segment: segment(0, 1),
                part: Part::new(0, 5),
            },
            source: SegmentPart {
                segment: segment(0, 0),
                part: Part::new(5, 10),
            },
            create_destination: true,
            delete_source: false,
        });

        assert_eq!(
            selection.segment_parts(segment(0, 0)).map(|p| p.parts().to_vec()),
            Some(vec![Part::new(2, 5)])
        );
        assert_eq!(
            selection.segment_parts(segment(0, 1)).map(|p| p.parts().to_vec()),
            Some(vec![Part::new(0, 3)])
        );
    }

    #[test]
    fn merge_shifts_parts_within_segment() {
        let mut selection = selection_of_part(segment(2, 0), Part::new(0, 4));

        selection.submit(&InfoMessage::SegmentPartMoved {
            destination: SegmentPart {
                segment: segment(2, 0),
                part: Part::new(6, 10),
            },
            source: SegmentPart {
                segment: segment(2, 0),
                part: Part::new(0, 4),
            },
            create_destination: false,
            delete_source: false,
        });

        assert!(selection.is_selected_segment_part(SegmentPart {
            segment: segment(2, 0),
            part: Part::new(6, 10),
        }));
    }

    #[test]
    fn deleted_segments_are_pruned() {
        let mut selection = selection_of_part(segment(0, 2), Part::new(0, 3));
        selection.submit(&InfoMessage::SegmentPartDeleted {
            segment_part: SegmentPart {
                segment: segment(0, 2),
                part: Part::new(0, 3),
            },
            delete_segment: true,
        });
        assert!(selection.is_empty());

        let mut selection = selection_of_part(segment(0, 5), Part::new(0, 3));
        selection.submit(&InfoMessage::SegmentIdUpdated {
            new_segment: segment(0, 1),
            old_segment: segment(0, 5),
        });
        assert!(selection.is_selected_segment(segment(0, 1)));

        selection.submit(&InfoMessage::SegmentCreated {
            segment: segment(0, 7),
            size: Offset(3),
        });
        assert_eq!(selection.selected_segment_parts().len(), 1);
    }

    #[test]
    fn pop_segment_part_consumes_in_order() {
        let mut selection = Selection::new();
        selection.add_segment(SegmentPart {
            segment: segment(0, 0),
            part: Part::new(0, 2),
        });
        selection.add_segment(SegmentPart {
            segment: segment(0, 0),
            part: Part::new(4, 6),
        });

        assert_eq!(
            selection.pop_segment_part().map(|p| p.part),
            Some(Part::new(0, 2))
        );
        assert_eq!(
            selection.pop_segment_part().map(|p| p.part),
            Some(Part::new(4, 6))
        );
        assert!(selection.pop_segment_part().is_none());
    }
}
