//! Die dem Benutzer angezeigte Selektion.
//!
//! Besteht aus einer verfolgten Ausgangsselektion und einer Liste von
//! Rechteck-Operationen, die erst beim Abfragen gegen das Layout ausgewertet
//! werden. Nur die Ausgangsselektion folgt den Änderungsnachrichten.

use crate::core::index::spatial_index::{
    decoration_selection_rect, line_selection_rect, logicitem_selection_rect,
};
use crate::core::index::{LayoutIndex, SpatialElement};
use crate::core::{
    DecorationId, InfoMessage, Layout, LogicItemId, OrderedLine, Part, RectFine, Segment,
    SegmentPart, Selection, WireId,
};

/// Wirkung einer Rechteck-Operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionFunction {
    Add,
    Substract,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleSelectionOperation {
    pub function: SelectionFunction,
    pub rect: RectFine,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisibleSelection {
    initial_selection: Selection,
    operations: Vec<VisibleSelectionOperation>,
}

/// Teilbereich einer Linie innerhalb eines Rechtecks, entlang ihrer Achse.
pub fn part_in_rect(line: OrderedLine, rect: RectFine) -> Option<Part> {
    let (reference, first, last, min, max) = if line.is_horizontal() {
        (
            line.p0.x.value(),
            line.p0.x.value(),
            line.p1.x.value(),
            rect.p0.x.floor() as i32,
            rect.p1.x.ceil() as i32,
        )
    } else {
        (
            line.p0.y.value(),
            line.p0.y.value(),
            line.p1.y.value(),
            rect.p0.y.floor() as i32,
            rect.p1.y.ceil() as i32,
        )
    };

    let begin = first.clamp(min, max);
    let end = last.clamp(min, max);
    if begin == end {
        return None;
    }
    Some(Part::new(
        (begin - reference) as u16,
        (end - reference) as u16,
    ))
}

fn apply_logicitem(selection: &mut Selection, id: LogicItemId, function: SelectionFunction) {
    match function {
        SelectionFunction::Add => selection.add_logicitem(id),
        SelectionFunction::Substract => selection.remove_logicitem(id),
    }
}

fn apply_decoration(selection: &mut Selection, id: DecorationId, function: SelectionFunction) {
    match function {
        SelectionFunction::Add => selection.add_decoration(id),
        SelectionFunction::Substract => selection.remove_decoration(id),
    }
}

fn apply_segment(
    selection: &mut Selection,
    layout: &Layout,
    segment: Segment,
    operation: VisibleSelectionOperation,
) {
    let Some(part) = part_in_rect(layout.line(segment), operation.rect) else {
        return;
    };
    let segment_part = SegmentPart { segment, part };
    match operation.function {
        SelectionFunction::Add => selection.add_segment(segment_part),
        SelectionFunction::Substract => selection.remove_segment(segment_part),
    }
}

/// Wendet eine Operation auf alle getroffenen Elemente an.
///
/// Eingefügte Elemente kommen aus dem räumlichen Index, alle übrigen werden
/// direkt im Layout geprüft.
fn apply_operation(
    selection: &mut Selection,
    layout: &Layout,
    index: &LayoutIndex,
    operation: VisibleSelectionOperation,
) {
    for element in index.spatial_index().query_selection(operation.rect) {
        match element {
            SpatialElement::LogicItem(id) => apply_logicitem(selection, id, operation.function),
            SpatialElement::Decoration(id) => apply_decoration(selection, id, operation.function),
            SpatialElement::Segment(segment) => {
                apply_segment(selection, layout, segment, operation)
            }
        }
    }

    for (id, logicitem) in layout.logicitems() {
        if !logicitem.display_state.is_inserted()
            && logicitem_selection_rect(&logicitem.data()).intersects(&operation.rect)
        {
            apply_logicitem(selection, id, operation.function);
        }
    }
    for (id, decoration) in layout.decorations() {
        if !decoration.display_state.is_inserted()
            && decoration_selection_rect(&decoration.data()).intersects(&operation.rect)
        {
            apply_decoration(selection, id, operation.function);
        }
    }
    for wire_id in [WireId::TEMPORARY, WireId::COLLIDING] {
        for (segment_index, info) in layout.segment_tree(wire_id).iter() {
            if line_selection_rect(info.line).intersects(&operation.rect) {
                let segment = Segment::new(wire_id, segment_index);
                apply_segment(selection, layout, segment, operation);
            }
        }
    }
}

/// Alle Elemente im Rechteck, Segmente nur mit dem getroffenen Teilbereich.
pub fn selection_in_rect(layout: &Layout, index: &LayoutIndex, rect: RectFine) -> Selection {
    let mut selection = Selection::new();
    apply_operation(
        &mut selection,
        layout,
        index,
        VisibleSelectionOperation {
            function: SelectionFunction::Add,
            rect,
        },
    );
    selection
}

impl VisibleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_selection(selection: Selection) -> Self {
        Self {
            initial_selection: selection,
            operations: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.initial_selection.is_empty() && self.operations.is_empty()
    }

    pub fn initial_selection(&self) -> &Selection {
        &self.initial_selection
    }

    pub fn initial_selection_mut(&mut self) -> &mut Selection {
        &mut self.initial_selection
    }

    pub fn operations(&self) -> &[VisibleSelectionOperation] {
        &self.operations
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.initial_selection = selection;
        self.operations.clear();
    }

    pub fn add(&mut self, operation: VisibleSelectionOperation) {
        self.operations.push(operation);
    }

    /// Ersetzt das Rechteck der letzten Operation.
    pub fn update_last(&mut self, rect: RectFine) {
        let Some(last) = self.operations.last_mut() else {
            panic!("keine Operation zum Aktualisieren vorhanden");
        };
        last.rect = rect;
    }

    pub fn pop_last(&mut self) -> VisibleSelectionOperation {
        match self.operations.pop() {
            Some(operation) => operation,
            None => panic!("keine Operation zum Entfernen vorhanden"),
        }
    }

    /// Ausgewertete Selektion.
    pub fn selection(&self, layout: &Layout, index: &LayoutIndex) -> Selection {
        let mut selection = self.initial_selection.clone();
        for operation in &self.operations {
            apply_operation(&mut selection, layout, index, *operation);
        }
        selection
    }

    pub fn submit(&mut self, message: &InfoMessage) {
        self.initial_selection.submit(message);
    }

    pub fn is_valid(&self, layout: &Layout) -> bool {
        self.initial_selection.is_valid(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Point, SegmentIndex, SegmentInfo};
    use glam::Vec2;

    fn line(x0: i16, y0: i16, x1: i16, y1: i16) -> OrderedLine {
        OrderedLine::from_points(Point::new(x0, y0), Point::new(x1, y1))
    }

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> RectFine {
        RectFine::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    #[test]
    fn part_in_rect_clamps_to_line() {
        let l = line(5, 1, 10, 1);
        assert_eq!(part_in_rect(l, rect(0.0, 0.0, 10.0, 10.0)), Some(Part::new(0, 5)));
        assert_eq!(part_in_rect(l, rect(6.0, 0.0, 7.0, 10.0)), Some(Part::new(1, 2)));
        assert_eq!(part_in_rect(l, rect(0.0, 0.0, 5.0, 10.0)), None);
        assert_eq!(part_in_rect(l, rect(5.5, 0.0, 7.5, 10.0)), Some(Part::new(0, 3)));
    }

    #[test]
    fn temporary_segments_are_selected_by_rect() {
        let mut layout = Layout::new();
        let index = LayoutIndex::new();
        layout
            .segment_tree_mut(WireId::TEMPORARY)
            .add_segment(SegmentInfo::shadow(line(0, 0, 10, 0)));

        let mut visible = VisibleSelection::new();
        visible.add(VisibleSelectionOperation {
            function: SelectionFunction::Add,
            rect: rect(2.0, -1.0, 4.0, 1.0),
        });

        let selection = visible.selection(&layout, &index);
        let segment = Segment::new(WireId::TEMPORARY, SegmentIndex(0));
        assert!(selection.is_selected_segment_part(SegmentPart {
            segment,
            part: Part::new(2, 4),
        }));
        assert!(!selection.is_selected_segment_part(SegmentPart {
            segment,
            part: Part::new(0, 2),
        }));

        visible.add(VisibleSelectionOperation {
            function: SelectionFunction::Substract,
            rect: rect(-5.0, -5.0, 20.0, 5.0),
        });
        assert!(visible.selection(&layout, &index).is_empty());
    }
}
