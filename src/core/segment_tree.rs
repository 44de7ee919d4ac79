//! Segmentbaum einer Leitung: orthogonale Linien mit typisierten Endpunkten.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::{intersection, merge_touching, OrderedLine, Part};
use super::grid::Point;
use super::ids::SegmentIndex;
use super::part_selection::{PartCopyDefinition, PartSelection};

/// Klassifikation eines Segment-Endpunkts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SegmentPointType {
    /// Eingang der Leitung (hier wird sie getrieben).
    Input,
    /// Ausgang der Leitung.
    Output,
    CornerPoint,
    CrossPoint,
    /// Geometrie ohne Kollisionsprüfung.
    ShadowPoint,
    NewUnknown,
}

impl SegmentPointType {
    pub fn is_connection(self) -> bool {
        matches!(self, SegmentPointType::Input | SegmentPointType::Output)
    }
}

impl fmt::Display for SegmentPointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SegmentPointType::Input => "input",
            SegmentPointType::Output => "output",
            SegmentPointType::CornerPoint => "corner_point",
            SegmentPointType::CrossPoint => "cross_point",
            SegmentPointType::ShadowPoint => "shadow_point",
            SegmentPointType::NewUnknown => "new_unknown",
        };
        f.write_str(name)
    }
}

/// Typen beider Endpunkte eines Segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoints {
    pub p0_type: SegmentPointType,
    pub p1_type: SegmentPointType,
}

impl Endpoints {
    pub const SHADOW: Endpoints = Endpoints {
        p0_type: SegmentPointType::ShadowPoint,
        p1_type: SegmentPointType::ShadowPoint,
    };

    /// Temporäre Segmente erlauben nur Schatten- und Kreuzungspunkte.
    pub fn valid_for_temporary(self) -> bool {
        let valid = |kind| {
            matches!(
                kind,
                SegmentPointType::ShadowPoint | SegmentPointType::CrossPoint
            )
        };
        valid(self.p0_type) && valid(self.p1_type)
    }
}

/// Linie plus Endpunkt-Typen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentInfo {
    pub line: OrderedLine,
    pub p0_type: SegmentPointType,
    pub p1_type: SegmentPointType,
}

impl SegmentInfo {
    pub fn new(line: OrderedLine, endpoints: Endpoints) -> Self {
        Self {
            line,
            p0_type: endpoints.p0_type,
            p1_type: endpoints.p1_type,
        }
    }

    /// Segment mit zwei Schattenpunkten.
    pub fn shadow(line: OrderedLine) -> Self {
        Self::new(line, Endpoints::SHADOW)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            p0_type: self.p0_type,
            p1_type: self.p1_type,
        }
    }

    /// Typ am Punkt `p0` oder `p1`.
    pub fn point_type(&self, point: Point) -> SegmentPointType {
        if point == self.line.p0 {
            self.p0_type
        } else if point == self.line.p1 {
            self.p1_type
        } else {
            panic!("{point} ist kein Endpunkt von {}", self.line)
        }
    }

    fn count_of(&self, kind: SegmentPointType) -> usize {
        usize::from(self.p0_type == kind) + usize::from(self.p1_type == kind)
    }
}

/// Setzt den Typ an einem Endpunkt.
pub fn updated_segment_info(info: SegmentInfo, point: Point, kind: SegmentPointType) -> SegmentInfo {
    let mut result = info;
    if point == info.line.p0 {
        result.p0_type = kind;
    } else if point == info.line.p1 {
        result.p1_type = kind;
    } else {
        panic!("{point} ist kein Endpunkt von {}", info.line)
    }
    result
}

/// Kürzt ein Segment auf einen Teilbereich.
///
/// Endpunkte an Schnittstellen werden zu Schattenpunkten.
pub fn adjust(info: SegmentInfo, part: Part) -> SegmentInfo {
    let full = info.line.full_part();
    assert!(
        full.begin <= part.begin && part.end <= full.end,
        "Part {part} liegt nicht in {}",
        info.line
    );
    SegmentInfo {
        line: info.line.sub_line(part),
        p0_type: if part.begin == full.begin {
            info.p0_type
        } else {
            SegmentPointType::ShadowPoint
        },
        p1_type: if part.end == full.end {
            info.p1_type
        } else {
            SegmentPointType::ShadowPoint
        },
    }
}

/// Verbindet zwei sich berührende, parallele Segmente.
///
/// Die äußeren Endpunkt-Typen bleiben erhalten.
pub fn merge_touching_infos(a: SegmentInfo, b: SegmentInfo) -> SegmentInfo {
    let (first, second) = if a.line <= b.line { (a, b) } else { (b, a) };
    SegmentInfo {
        line: merge_touching(first.line, second.line),
        p0_type: first.p0_type,
        p1_type: second.p1_type,
    }
}

/// Alle Segmente eines Baums mit ihren gültigen (kollisionsgeprüften) Teilbereichen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentTree {
    segments: Vec<SegmentInfo>,
    valid_parts: Vec<PartSelection>,
    input_count: usize,
    output_count: usize,
}

impl SegmentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn indices(&self) -> impl DoubleEndedIterator<Item = SegmentIndex> {
        (0..self.segments.len()).map(SegmentIndex::from_index)
    }

    /// Letzter gültiger Index.
    pub fn last_index(&self) -> SegmentIndex {
        assert!(!self.segments.is_empty(), "Baum ist leer");
        SegmentIndex::from_index(self.segments.len() - 1)
    }

    pub fn info(&self, index: SegmentIndex) -> &SegmentInfo {
        &self.segments[index.index()]
    }

    pub fn line(&self, index: SegmentIndex) -> OrderedLine {
        self.segments[index.index()].line
    }

    pub fn part(&self, index: SegmentIndex) -> Part {
        self.line(index).full_part()
    }

    pub fn valid_parts(&self, index: SegmentIndex) -> &PartSelection {
        &self.valid_parts[index.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegmentIndex, &SegmentInfo)> {
        self.segments
            .iter()
            .enumerate()
            .map(|(index, info)| (SegmentIndex::from_index(index), info))
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    pub fn has_input(&self) -> bool {
        self.input_count > 0
    }

    /// Position des ersten Eingangs.
    pub fn input_position(&self) -> Option<Point> {
        self.segments.iter().find_map(|info| {
            if info.p0_type == SegmentPointType::Input {
                Some(info.line.p0)
            } else if info.p1_type == SegmentPointType::Input {
                Some(info.line.p1)
            } else {
                None
            }
        })
    }

    fn register(&mut self, info: &SegmentInfo) {
        self.input_count += info.count_of(SegmentPointType::Input);
        self.output_count += info.count_of(SegmentPointType::Output);
    }

    fn unregister(&mut self, info: &SegmentInfo) {
        self.input_count = self
            .input_count
            .saturating_sub(info.count_of(SegmentPointType::Input));
        self.output_count = self
            .output_count
            .saturating_sub(info.count_of(SegmentPointType::Output));
    }

    // ── Mutationen ──────────────────────────────────────────────────

    pub fn add_segment(&mut self, info: SegmentInfo) -> SegmentIndex {
        self.register(&info);
        self.segments.push(info);
        self.valid_parts.push(PartSelection::new());
        self.last_index()
    }

    /// Kopiert einen Teilbereich eines Segments aus einem anderen Baum.
    pub fn copy_segment(&mut self, source: &SegmentTree, index: SegmentIndex, part: Part) -> SegmentIndex {
        let source_info = *source.info(index);
        let info = adjust(source_info, part);

        let mut valid = PartSelection::new();
        let destination = Part::new(0, (part.end.value() - part.begin.value()) as u16);
        valid.copy_parts(
            source.valid_parts(index),
            PartCopyDefinition::new(destination, part),
        );

        self.register(&info);
        self.segments.push(info);
        self.valid_parts.push(valid);
        self.last_index()
    }

    /// Kopiert einen Teilbereich innerhalb desselben Baums.
    pub fn copy_segment_within(&mut self, index: SegmentIndex, part: Part) -> SegmentIndex {
        let info = adjust(*self.info(index), part);
        let destination = Part::new(0, part.length() as u16);

        let mut valid = PartSelection::new();
        valid.copy_parts(
            self.valid_parts(index),
            PartCopyDefinition::new(destination, part),
        );

        self.register(&info);
        self.segments.push(info);
        self.valid_parts.push(valid);
        self.last_index()
    }

    /// Kürzt ein Segment auf den behaltenen Teilbereich.
    pub fn shrink_segment(&mut self, index: SegmentIndex, part_kept: Part) {
        let old = *self.info(index);
        let new = adjust(old, part_kept);

        let mut valid = PartSelection::new();
        valid.copy_parts(
            self.valid_parts(index),
            PartCopyDefinition::new(Part::new(0, part_kept.length() as u16), part_kept),
        );

        self.unregister(&old);
        self.register(&new);
        self.segments[index.index()] = new;
        self.valid_parts[index.index()] = valid;
    }

    /// Ersetzt die Info (Linie oder Endpunkte) eines Segments.
    ///
    /// Gültige Bereiche außerhalb der neuen Länge entfallen.
    pub fn update_segment(&mut self, index: SegmentIndex, info: SegmentInfo) {
        let old = *self.info(index);
        self.unregister(&old);
        self.register(&info);
        self.segments[index.index()] = info;

        let full = info.line.full_part();
        let trimmed = PartSelection::from_parts(
            self.valid_parts[index.index()]
                .iter()
                .filter_map(|part| intersection(part, full)),
        );
        self.valid_parts[index.index()] = trimmed;
    }

    /// Löscht ein Segment; das letzte Segment rückt an seine Stelle.
    pub fn swap_and_delete_segment(&mut self, index: SegmentIndex) {
        let info = self.segments.swap_remove(index.index());
        self.valid_parts.swap_remove(index.index());
        self.unregister(&info);
    }

    /// Verschmilzt `delete` in `keep` und löscht `delete` per Swap-Remove.
    ///
    /// Verlangt `keep < delete`, damit `keep` seinen Index behält.
    pub fn swap_and_merge_segment(&mut self, keep: SegmentIndex, delete: SegmentIndex) {
        assert!(keep < delete, "Merge verlangt geordnete Indizes");

        let info_keep = *self.info(keep);
        let info_delete = *self.info(delete);
        let merged = merge_touching_infos(info_keep, info_delete);

        let mut valid = PartSelection::new();
        for (info, index) in [(info_keep, keep), (info_delete, delete)] {
            let destination = merged.line.to_part(info.line);
            valid.copy_parts(
                self.valid_parts(index),
                PartCopyDefinition::new(destination, info.line.full_part()),
            );
        }

        self.unregister(&info_keep);
        self.register(&merged);
        self.segments[keep.index()] = merged;
        self.valid_parts[keep.index()] = valid;

        self.swap_and_delete_segment(delete);
    }

    pub fn mark_valid(&mut self, index: SegmentIndex, part: Part) {
        self.valid_parts[index.index()].add_part(part);
    }

    pub fn unmark_valid(&mut self, index: SegmentIndex, part: Part) {
        self.valid_parts[index.index()].remove_part(part);
    }

    /// Hängt alle Segmente eines anderen Baums an.
    pub fn add_tree(&mut self, other: &SegmentTree) {
        for (info, valid) in other.segments.iter().zip(&other.valid_parts) {
            self.register(info);
            self.segments.push(*info);
            self.valid_parts.push(valid.clone());
        }
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.valid_parts.clear();
        self.input_count = 0;
        self.output_count = 0;
    }

    // ── Topologie ───────────────────────────────────────────────────

    /// Zusammenhangskomponenten: Segmente sind verbunden, wenn ein Endpunkt
    /// des einen auf dem anderen liegt.
    ///
    /// Liefert je Segment die Nummer seiner Komponente, Komponente 0 enthält Index 0.
    pub fn connected_components(&self) -> Vec<usize> {
        let count = self.segments.len();
        let mut parent: Vec<usize> = (0..count).collect();

        fn find(parent: &mut [usize], mut node: usize) -> usize {
            while parent[node] != node {
                parent[node] = parent[parent[node]];
                node = parent[node];
            }
            node
        }

        for (index, info) in self.segments.iter().enumerate() {
            for (other, other_info) in self.segments.iter().enumerate() {
                if index == other {
                    continue;
                }
                if other_info.line.contains(info.line.p0) || other_info.line.contains(info.line.p1) {
                    let a = find(&mut parent, index);
                    let b = find(&mut parent, other);
                    if a != b {
                        parent[a.max(b)] = a.min(b);
                    }
                }
            }
        }

        let mut labels: HashMap<usize, usize> = HashMap::new();
        (0..count)
            .map(|index| {
                let root = find(&mut parent, index);
                let next = labels.len();
                *labels.entry(root).or_insert(next)
            })
            .collect()
    }

    /// Prüft, ob alle Segmente eine Komponente bilden.
    pub fn is_connected(&self) -> bool {
        self.connected_components().iter().all(|label| *label == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Point;

    fn line(x0: i16, y0: i16, x1: i16, y1: i16) -> OrderedLine {
        OrderedLine::from_points(Point::new(x0, y0), Point::new(x1, y1))
    }

    fn info(l: OrderedLine, p0: SegmentPointType, p1: SegmentPointType) -> SegmentInfo {
        SegmentInfo {
            line: l,
            p0_type: p0,
            p1_type: p1,
        }
    }

    #[test]
    fn adjust_marks_cut_endpoints_as_shadow() {
        let original = info(
            line(0, 0, 10, 0),
            SegmentPointType::Input,
            SegmentPointType::Output,
        );

        let left = adjust(original, Part::new(0, 4));
        assert_eq!(left.line, line(0, 0, 4, 0));
        assert_eq!(left.p0_type, SegmentPointType::Input);
        assert_eq!(left.p1_type, SegmentPointType::ShadowPoint);

        let middle = adjust(original, Part::new(3, 6));
        assert_eq!(middle.endpoints(), Endpoints::SHADOW);
    }

    #[test]
    fn counters_follow_endpoint_types() {
        let mut tree = SegmentTree::new();
        let index = tree.add_segment(info(
            line(0, 0, 5, 0),
            SegmentPointType::Input,
            SegmentPointType::Output,
        ));
        assert_eq!(tree.input_count(), 1);
        assert_eq!(tree.output_count(), 1);
        assert_eq!(tree.input_position(), Some(Point::new(0, 0)));

        tree.update_segment(index, SegmentInfo::shadow(line(0, 0, 5, 0)));
        assert_eq!(tree.input_count(), 0);
        assert!(!tree.has_input());
    }

    #[test]
    fn shrink_and_copy_keep_valid_parts() {
        let mut tree = SegmentTree::new();
        let index = tree.add_segment(SegmentInfo::shadow(line(0, 0, 10, 0)));
        tree.mark_valid(index, Part::new(2, 8));

        let copy = tree.copy_segment_within(index, Part::new(5, 10));
        tree.shrink_segment(index, Part::new(0, 5));

        assert_eq!(tree.line(index), line(0, 0, 5, 0));
        assert_eq!(tree.valid_parts(index).parts(), &[Part::new(2, 5)]);
        assert_eq!(tree.line(copy), line(5, 0, 10, 0));
        assert_eq!(tree.valid_parts(copy).parts(), &[Part::new(0, 3)]);
    }

    #[test]
    fn merge_restores_split_segment() {
        let mut tree = SegmentTree::new();
        let left = tree.add_segment(info(
            line(0, 0, 4, 0),
            SegmentPointType::Output,
            SegmentPointType::ShadowPoint,
        ));
        let right = tree.add_segment(info(
            line(4, 0, 10, 0),
            SegmentPointType::ShadowPoint,
            SegmentPointType::Output,
        ));
        tree.mark_valid(right, Part::new(0, 6));

        tree.swap_and_merge_segment(left, right);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.line(left), line(0, 0, 10, 0));
        assert_eq!(
            tree.info(left).endpoints(),
            Endpoints {
                p0_type: SegmentPointType::Output,
                p1_type: SegmentPointType::Output,
            }
        );
        assert_eq!(tree.valid_parts(left).parts(), &[Part::new(4, 10)]);
        assert_eq!(tree.output_count(), 2);
    }

    #[test]
    fn swap_and_delete_moves_last_segment() {
        let mut tree = SegmentTree::new();
        let first = tree.add_segment(SegmentInfo::shadow(line(0, 0, 1, 0)));
        tree.add_segment(SegmentInfo::shadow(line(5, 0, 6, 0)));

        tree.swap_and_delete_segment(first);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.line(first), line(5, 0, 6, 0));
    }

    #[test]
    fn connected_components_ignore_crossings() {
        let mut tree = SegmentTree::new();
        tree.add_segment(SegmentInfo::shadow(line(0, 0, 10, 0)));
        tree.add_segment(SegmentInfo::shadow(line(5, 0, 5, 5)));
        tree.add_segment(SegmentInfo::shadow(line(20, -5, 20, 5)));
        tree.add_segment(SegmentInfo::shadow(line(15, 0, 25, 0)));

        assert_eq!(tree.connected_components(), vec![0, 0, 1, 2]);
        assert!(!tree.is_connected());
    }
}
