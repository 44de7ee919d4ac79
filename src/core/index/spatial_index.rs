//! Spatial-Index (KD-Tree) über allen eingefügten Elementen.
//!
//! Jedes Element wird mit dem Mittelpunkt seines Auswahlrechtecks eingetragen.
//! Abfragen suchen per umschließendem Kreis und filtern danach exakt gegen
//! die gespeicherten Rechtecke.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use kiddo::{KdTree, SquaredEuclidean};

use crate::core::decoration::DecorationData;
use crate::core::geometry::OrderedLine;
use crate::core::grid::{Point, RectFine};
use crate::core::ids::{DecorationId, LogicItemId, Segment};
use crate::core::logicitem::LogicItemData;
use crate::core::message::InfoMessage;

/// Auswahlrand um Logikelemente und Dekorationen.
pub const ELEMENT_SELECTION_PADDING: f32 = 0.5;
/// Auswahlrand um Leitungssegmente.
pub const LINE_SELECTION_PADDING: f32 = 0.3;

// Abstand zwischen Einträgen mit gleichem Mittelpunkt; bleibt deutlich unter
// QUERY_MARGIN, damit keine Treffer verloren gehen.
const JITTER_STEP: f64 = 1e-9;
const JITTER_PERIOD: u64 = 1 << 20;
const QUERY_MARGIN: f64 = 0.01;

/// Element, das im Spatial-Index liegt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpatialElement {
    LogicItem(LogicItemId),
    Decoration(DecorationId),
    Segment(Segment),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SpatialEntry {
    element: SpatialElement,
    rect: RectFine,
    line: Option<OrderedLine>,
    position: [f64; 2],
    radius: f64,
}

/// Auswahlrechteck eines Logikelements.
pub fn logicitem_selection_rect(data: &LogicItemData) -> RectFine {
    let (p0, p1) = data.bounding_points();
    RectFine::from_points(p0, p1).padded(ELEMENT_SELECTION_PADDING)
}

/// Auswahlrechteck einer Dekoration.
pub fn decoration_selection_rect(data: &DecorationData) -> RectFine {
    let (p0, p1) = data.bounding_points();
    RectFine::from_points(p0, p1).padded(ELEMENT_SELECTION_PADDING)
}

/// Auswahlrechteck eines Segments.
pub fn line_selection_rect(line: OrderedLine) -> RectFine {
    line.bounding_rect().padded(LINE_SELECTION_PADDING)
}

/// Inkrementeller KD-Tree mit exakten Rechtecken zur Nachfilterung.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    entries: HashMap<u64, SpatialEntry>,
    slots: HashMap<SpatialElement, u64>,
    next_slot: u64,
    /// Multimenge der Elementradien; Schlüssel sind die Bits nichtnegativer
    /// `f64`, deren Ordnung der numerischen entspricht.
    radii: BTreeMap<u64, usize>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialIndex {
    /// Erstellt einen leeren Spatial-Index.
    pub fn new() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            entries: HashMap::new(),
            slots: HashMap::new(),
            next_slot: 0,
            radii: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, element: SpatialElement, rect: RectFine, line: Option<OrderedLine>) {
        let slot = self.next_slot;
        self.next_slot += 1;

        let jitter = (slot % JITTER_PERIOD) as f64 * JITTER_STEP;
        let center = rect.center();
        let position = [center.x as f64 + jitter, center.y as f64 + jitter];

        let half = rect.half_extent();
        let radius = (half.x as f64).hypot(half.y as f64) + jitter;
        *self.radii.entry(radius.to_bits()).or_default() += 1;

        self.tree.add(&position, slot);
        self.entries.insert(
            slot,
            SpatialEntry {
                element,
                rect,
                line,
                position,
                radius,
            },
        );
        let previous = self.slots.insert(element, slot);
        assert!(previous.is_none(), "{element:?} liegt bereits im Spatial-Index");
    }

    fn remove(&mut self, element: SpatialElement) {
        let Some(slot) = self.slots.remove(&element) else {
            panic!("{element:?} fehlt im Spatial-Index");
        };
        if let Some(entry) = self.entries.remove(&slot) {
            self.tree.remove(&entry.position, slot);
            let key = entry.radius.to_bits();
            if let Some(count) = self.radii.get_mut(&key) {
                *count -= 1;
                if *count == 0 {
                    self.radii.remove(&key);
                }
            }
        }
    }

    /// Größter Radius aller eingetragenen Elemente.
    fn max_radius(&self) -> f64 {
        self.radii
            .keys()
            .next_back()
            .map_or(0.0, |bits| f64::from_bits(*bits))
    }

    fn rename(&mut self, old: SpatialElement, new: SpatialElement) {
        let Some(slot) = self.slots.remove(&old) else {
            panic!("{old:?} fehlt im Spatial-Index");
        };
        if let Some(entry) = self.entries.get_mut(&slot) {
            entry.element = new;
        }
        self.slots.insert(new, slot);
    }

    /// Alle Elemente, deren Auswahlrechteck das Rechteck schneidet.
    pub fn query_selection(&self, rect: RectFine) -> Vec<SpatialElement> {
        if self.is_empty() {
            return Vec::new();
        }

        let center = rect.center();
        let half = rect.half_extent();
        // Radius des umschließenden Kreises plus größte Elementausdehnung
        let radius = (half.x as f64).hypot(half.y as f64) + self.max_radius() + QUERY_MARGIN;

        let mut result: Vec<SpatialElement> = self
            .tree
            .within::<SquaredEuclidean>(&[center.x as f64, center.y as f64], radius * radius)
            .into_iter()
            .filter_map(|neighbour| self.entries.get(&neighbour.item))
            .filter(|entry| entry.rect.intersects(&rect))
            .map(|entry| entry.element)
            .collect();
        result.sort_unstable();
        result
    }

    /// Alle eingefügten Segmente, deren Linie den Punkt enthält, sortiert.
    pub fn query_line_segments(&self, point: Point) -> Vec<Segment> {
        let fine = point.to_fine();
        let mut result: Vec<Segment> = self
            .query_selection(RectFine::new(fine, fine))
            .into_iter()
            .filter_map(|element| match element {
                SpatialElement::Segment(segment) => Some(segment),
                _ => None,
            })
            .collect();
        result.retain(|segment| {
            self.slots
                .get(&SpatialElement::Segment(*segment))
                .and_then(|slot| self.entries.get(slot))
                .and_then(|entry| entry.line)
                .is_some_and(|line| line.contains(point))
        });
        result
    }

    /// Hat der Punkt ein Logikelement oder eine Dekoration im Auswahlrechteck?
    pub fn has_element_at(&self, point: Vec2) -> bool {
        self.query_selection(RectFine::new(point, point))
            .iter()
            .any(|element| !matches!(element, SpatialElement::Segment(_)))
    }

    pub fn submit(&mut self, message: &InfoMessage) {
        match message {
            InfoMessage::LogicItemInserted { logicitem_id, data } => self.insert(
                SpatialElement::LogicItem(*logicitem_id),
                logicitem_selection_rect(data),
                None,
            ),
            InfoMessage::InsertedLogicItemIdUpdated {
                new_logicitem_id,
                old_logicitem_id,
                ..
            } => self.rename(
                SpatialElement::LogicItem(*old_logicitem_id),
                SpatialElement::LogicItem(*new_logicitem_id),
            ),
            InfoMessage::LogicItemUninserted { logicitem_id, .. } => {
                self.remove(SpatialElement::LogicItem(*logicitem_id))
            }

            InfoMessage::DecorationInserted {
                decoration_id,
                data,
            } => self.insert(
                SpatialElement::Decoration(*decoration_id),
                decoration_selection_rect(data),
                None,
            ),
            InfoMessage::InsertedDecorationIdUpdated {
                new_decoration_id,
                old_decoration_id,
                ..
            } => self.rename(
                SpatialElement::Decoration(*old_decoration_id),
                SpatialElement::Decoration(*new_decoration_id),
            ),
            InfoMessage::DecorationUninserted { decoration_id, .. } => {
                self.remove(SpatialElement::Decoration(*decoration_id))
            }

            InfoMessage::SegmentInserted { segment, info } => self.insert(
                SpatialElement::Segment(*segment),
                line_selection_rect(info.line),
                Some(info.line),
            ),
            InfoMessage::InsertedSegmentIdUpdated {
                new_segment,
                old_segment,
                ..
            } => self.rename(
                SpatialElement::Segment(*old_segment),
                SpatialElement::Segment(*new_segment),
            ),
            InfoMessage::SegmentUninserted { segment, .. } => {
                self.remove(SpatialElement::Segment(*segment))
            }
            _ => {}
        }
    }

    /// Sortierte Elemente mit Rechteck, für Vergleiche unabhängig vom Baumaufbau.
    pub fn entries(&self) -> Vec<(SpatialElement, RectFine)> {
        let mut result: Vec<(SpatialElement, RectFine)> = self
            .entries
            .values()
            .map(|entry| (entry.element, entry.rect))
            .collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Orientation;
    use crate::core::ids::{SegmentIndex, WireId};
    use crate::core::logicitem::{LogicItemDefinition, LogicItemType};
    use crate::core::segment_tree::SegmentInfo;

    fn segment(wire: u32, index: u32) -> Segment {
        Segment::new(WireId(wire), SegmentIndex(index))
    }

    fn insert_line(index: &mut SpatialIndex, segment: Segment, x0: i16, y0: i16, x1: i16, y1: i16) {
        let line = OrderedLine::from_points(Point::new(x0, y0), Point::new(x1, y1));
        index.submit(&InfoMessage::SegmentInserted {
            segment,
            info: SegmentInfo::shadow(line),
        });
    }

    #[test]
    fn empty_index_returns_nothing() {
        let index = SpatialIndex::new();
        assert!(index.query_line_segments(Point::new(0, 0)).is_empty());
        assert!(index
            .query_selection(RectFine::new(Vec2::ZERO, Vec2::splat(10.0)))
            .is_empty());
    }

    #[test]
    fn line_segments_at_point() {
        let mut index = SpatialIndex::new();
        insert_line(&mut index, segment(2, 0), 0, 0, 10, 0);
        insert_line(&mut index, segment(2, 1), 5, 0, 5, 10);
        insert_line(&mut index, segment(3, 0), 20, 0, 30, 0);

        assert_eq!(
            index.query_line_segments(Point::new(5, 0)),
            vec![segment(2, 0), segment(2, 1)]
        );
        assert_eq!(index.query_line_segments(Point::new(0, 0)), vec![segment(2, 0)]);
        assert!(index.query_line_segments(Point::new(5, 1)).len() == 1);
        assert!(index.query_line_segments(Point::new(15, 0)).is_empty());
    }

    #[test]
    fn search_radius_shrinks_after_removal() {
        let mut index = SpatialIndex::new();
        let long = OrderedLine::from_points(Point::new(-1000, 0), Point::new(1000, 0));
        insert_line(&mut index, segment(2, 0), -1000, 0, 1000, 0);
        insert_line(&mut index, segment(3, 0), 0, 5, 2, 5);
        assert!(index.max_radius() > 999.0);

        index.submit(&InfoMessage::SegmentUninserted {
            segment: segment(2, 0),
            info: SegmentInfo::shadow(long),
        });
        assert!(index.max_radius() < 2.0);
        assert_eq!(index.query_line_segments(Point::new(1, 5)), vec![segment(3, 0)]);

        index.submit(&InfoMessage::SegmentUninserted {
            segment: segment(3, 0),
            info: SegmentInfo::shadow(OrderedLine::from_points(
                Point::new(0, 5),
                Point::new(2, 5),
            )),
        });
        assert_eq!(index.max_radius(), 0.0);
    }

    #[test]
    fn long_lines_are_found_far_from_center() {
        let mut index = SpatialIndex::new();
        insert_line(&mut index, segment(2, 0), -1000, 0, 1000, 0);

        assert_eq!(
            index.query_line_segments(Point::new(-999, 0)),
            vec![segment(2, 0)]
        );
    }

    #[test]
    fn many_identical_entries_do_not_break_the_tree() {
        let mut index = SpatialIndex::new();
        for i in 0..200 {
            insert_line(&mut index, segment(2 + i, 0), 0, 0, 0, 4);
        }
        assert_eq!(index.query_line_segments(Point::new(0, 2)).len(), 200);
    }

    #[test]
    fn id_updates_rename_entries() {
        let mut index = SpatialIndex::new();
        let data = LogicItemData::new(
            LogicItemDefinition::new(LogicItemType::AndElement, 2, Orientation::Right),
            Point::new(10, 10),
        );
        index.submit(&InfoMessage::LogicItemInserted {
            logicitem_id: LogicItemId(3),
            data: data.clone(),
        });
        index.submit(&InfoMessage::InsertedLogicItemIdUpdated {
            new_logicitem_id: LogicItemId(0),
            old_logicitem_id: LogicItemId(3),
            data: data.clone(),
        });

        let found = index.query_selection(RectFine::new(Vec2::new(11.0, 10.5), Vec2::new(11.0, 10.5)));
        assert_eq!(found, vec![SpatialElement::LogicItem(LogicItemId(0))]);
        assert!(index.has_element_at(Vec2::new(11.0, 10.5)));

        index.submit(&InfoMessage::LogicItemUninserted {
            logicitem_id: LogicItemId(0),
            data,
        });
        assert!(index.is_empty());
    }
}
