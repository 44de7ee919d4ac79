//! Maus-Werkzeuge als geschlossener Summentyp.
//!
//! Jedes Werkzeug übersetzt Drücken, Ziehen und Loslassen in eine Folge von
//! Modifier-Aufrufen. Eine Geste bildet genau eine Undo-Gruppe: geöffnet beim
//! Drücken, geschlossen beim Loslassen.

use glam::Vec2;

use crate::core::grid::is_representable;
use crate::core::{
    DecorationDefinition, DecorationId, DisplayState, InsertionMode, LineInsertionType,
    LogicItemDefinition, LogicItemId, Point, RectFine, SegmentPart, Selection,
};

use super::modifier::Modifier;
use super::selection_store::SelectionId;
use super::visible_selection::SelectionFunction;

/// Abstand um einen Klickpunkt, in dem Elemente getroffen werden.
const PICK_RADIUS: f32 = 0.25;

/// Rundet eine Weltposition auf den nächsten Gitterpunkt.
pub fn to_grid_point(position: Vec2) -> Option<Point> {
    let x = position.x.round();
    let y = position.y.round();
    if !x.is_finite() || !y.is_finite() || !is_representable(x as i32, y as i32) {
        return None;
    }
    Some(Point::new(x as i16, y as i16))
}

fn pick_rect(position: Vec2) -> RectFine {
    RectFine::new(
        position - Vec2::splat(PICK_RADIUS),
        position + Vec2::splat(PICK_RADIUS),
    )
}

/// Element, dessen Einstellungen geöffnet werden sollen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingTarget {
    LogicItem(LogicItemId),
    Decoration(DecorationId),
}

// ── Einfügen ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct InsertLogicItemTool {
    pub definition: LogicItemDefinition,
    inserted: Option<LogicItemId>,
    last: Option<Point>,
}

impl InsertLogicItemTool {
    pub fn new(definition: LogicItemDefinition) -> Self {
        Self {
            definition,
            inserted: None,
            last: None,
        }
    }

    fn press(&mut self, modifier: &mut Modifier, position: Vec2) {
        let Some(point) = to_grid_point(position) else {
            return;
        };
        modifier.begin_undo_group();
        self.inserted = modifier
            .add_logicitem(self.definition.clone(), point, InsertionMode::Temporary)
            .and_then(|id| modifier.change_logicitem_insertion_mode(id, InsertionMode::Collisions));
        self.last = Some(point);
    }

    fn drag(&mut self, modifier: &mut Modifier, position: Vec2) {
        let (Some(logicitem_id), Some(last), Some(point)) =
            (self.inserted, self.last, to_grid_point(position))
        else {
            return;
        };
        if point == last {
            return;
        }
        let (dx, dy) = (point.x.value() - last.x.value(), point.y.value() - last.y.value());

        let Some(logicitem_id) =
            modifier.change_logicitem_insertion_mode(logicitem_id, InsertionMode::Temporary)
        else {
            self.inserted = None;
            return;
        };
        if !modifier.move_or_delete_temporary_logicitem(logicitem_id, dx, dy) {
            self.inserted = None;
            return;
        }
        self.inserted =
            modifier.change_logicitem_insertion_mode(logicitem_id, InsertionMode::Collisions);
        self.last = Some(point);
    }

    fn release(&mut self, modifier: &mut Modifier) {
        if let Some(logicitem_id) = self.inserted.take() {
            modifier.change_logicitem_insertion_mode(logicitem_id, InsertionMode::InsertOrDiscard);
        }
        self.last = None;
        modifier.finish_undo_group();
    }
}

#[derive(Debug, Clone)]
pub struct InsertDecorationTool {
    pub definition: DecorationDefinition,
    inserted: Option<DecorationId>,
    last: Option<Point>,
}

impl InsertDecorationTool {
    pub fn new(definition: DecorationDefinition) -> Self {
        Self {
            definition,
            inserted: None,
            last: None,
        }
    }

    fn press(&mut self, modifier: &mut Modifier, position: Vec2) {
        let Some(point) = to_grid_point(position) else {
            return;
        };
        modifier.begin_undo_group();
        self.inserted = modifier
            .add_decoration(self.definition.clone(), point, InsertionMode::Temporary)
            .and_then(|id| {
                modifier.change_decoration_insertion_mode(id, InsertionMode::Collisions)
            });
        self.last = Some(point);
    }

    fn drag(&mut self, modifier: &mut Modifier, position: Vec2) {
        let (Some(decoration_id), Some(last), Some(point)) =
            (self.inserted, self.last, to_grid_point(position))
        else {
            return;
        };
        if point == last {
            return;
        }
        let (dx, dy) = (point.x.value() - last.x.value(), point.y.value() - last.y.value());

        let Some(decoration_id) =
            modifier.change_decoration_insertion_mode(decoration_id, InsertionMode::Temporary)
        else {
            self.inserted = None;
            return;
        };
        if !modifier.move_or_delete_temporary_decoration(decoration_id, dx, dy) {
            self.inserted = None;
            return;
        }
        self.inserted =
            modifier.change_decoration_insertion_mode(decoration_id, InsertionMode::Collisions);
        self.last = Some(point);
    }

    fn release(&mut self, modifier: &mut Modifier) {
        if let Some(decoration_id) = self.inserted.take() {
            modifier.change_decoration_insertion_mode(decoration_id, InsertionMode::InsertOrDiscard);
        }
        self.last = None;
        modifier.finish_undo_group();
    }
}

/// Zieht eine L-förmige Leitung vom Startpunkt zur Mausposition.
#[derive(Debug, Clone, Default)]
pub struct InsertWireTool {
    start: Option<Point>,
    kind: Option<LineInsertionType>,
    segments: Option<SelectionId>,
}

impl InsertWireTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn press(&mut self, modifier: &mut Modifier, position: Vec2) {
        let Some(point) = to_grid_point(position) else {
            return;
        };
        modifier.begin_undo_group();
        self.start = Some(point);
        self.kind = None;
        self.segments = Some(modifier.create_selection(Selection::new()));
    }

    fn drag(&mut self, modifier: &mut Modifier, position: Vec2) {
        let (Some(start), Some(selection_id), Some(point)) =
            (self.start, self.segments, to_grid_point(position))
        else {
            return;
        };

        // Knickrichtung folgt der ersten Bewegung
        let kind = *self.kind.get_or_insert_with(|| {
            let dx = (point.x.value() - start.x.value()).abs();
            let dy = (point.y.value() - start.y.value()).abs();
            if dx >= dy {
                LineInsertionType::HorizontalFirst
            } else {
                LineInsertionType::VerticalFirst
            }
        });
        if point == start {
            self.kind = None;
        }

        let previous = modifier.selection(selection_id).clone();
        if !previous.is_empty() {
            modifier.delete_all(previous);
        }
        let parts = modifier.add_wire_segments(start, point, kind, InsertionMode::Collisions);
        *modifier.selection_mut(selection_id) = parts_selection(&parts);
    }

    fn release(&mut self, modifier: &mut Modifier) {
        if let Some(selection_id) = self.segments.take() {
            let selection = modifier.selection(selection_id).clone();
            modifier.destroy_selection(selection_id);
            modifier.change_insertion_mode_consuming(selection, InsertionMode::InsertOrDiscard);
        }
        self.start = None;
        self.kind = None;
        modifier.finish_undo_group();
    }
}

fn parts_selection(parts: &[SegmentPart]) -> Selection {
    let mut selection = Selection::new();
    for segment_part in parts {
        selection.add_segment(*segment_part);
    }
    selection
}

// ── Selektion ───────────────────────────────────────────────────────

/// Rechteckauswahl, addierend oder subtrahierend.
#[derive(Debug, Clone)]
pub struct SelectAreaTool {
    pub function: SelectionFunction,
    /// Bestehende Auswahl beim Drücken behalten
    pub keep_selection: bool,
    start: Option<Vec2>,
}

impl SelectAreaTool {
    pub fn new(function: SelectionFunction, keep_selection: bool) -> Self {
        Self {
            function,
            keep_selection,
            start: None,
        }
    }

    fn press(&mut self, modifier: &mut Modifier, position: Vec2) {
        modifier.begin_undo_group();
        if !self.keep_selection {
            modifier.clear_visible_selection();
        }
        modifier.add_visible_selection_rect(self.function, RectFine::new(position, position));
        self.start = Some(position);
    }

    fn drag(&mut self, modifier: &mut Modifier, position: Vec2) {
        if let Some(start) = self.start {
            modifier.update_visible_selection_rect(RectFine::new(start, position));
        }
    }

    fn release(&mut self, modifier: &mut Modifier) {
        if self.start.take().is_some() {
            modifier.apply_all_visible_selection_operations();
        }
        modifier.finish_undo_group();
    }
}

/// Auswahl des Elements unter dem Mauszeiger.
#[derive(Debug, Clone, Default)]
pub struct SelectSingleTool {
    /// Zur bestehenden Auswahl hinzufügen statt sie zu ersetzen
    pub add: bool,
}

impl SelectSingleTool {
    pub fn new(add: bool) -> Self {
        Self { add }
    }

    fn press(&mut self, modifier: &mut Modifier, position: Vec2) {
        modifier.begin_undo_group();
        let hit = modifier.query_selection(pick_rect(position));
        if self.add {
            modifier.add_to_visible_selection(&hit);
        } else {
            modifier.set_visible_selection(hit);
        }
    }

    fn release(&mut self, modifier: &mut Modifier) {
        modifier.finish_undo_group();
    }
}

/// Verschiebt die sichtbare Selektion.
///
/// Beim Drücken wird alles temporär, beim Loslassen werden die Leitungen
/// regularisiert und wieder eingefügt.
#[derive(Debug, Clone, Default)]
pub struct SelectMoveTool {
    last: Option<Point>,
    moving: Option<SelectionId>,
    cross_points: Vec<Point>,
}

impl SelectMoveTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn press(&mut self, modifier: &mut Modifier, position: Vec2) {
        let Some(point) = to_grid_point(position) else {
            return;
        };
        modifier.begin_undo_group();
        let selection = modifier.visible_selection();
        if selection.is_empty() {
            return;
        }

        self.cross_points = modifier.get_inserted_cross_points(&selection);
        let selection_id = modifier.create_selection(selection.clone());
        modifier.change_insertion_mode_consuming(selection, InsertionMode::Temporary);
        self.moving = Some(selection_id);
        self.last = Some(point);
    }

    fn drag(&mut self, modifier: &mut Modifier, position: Vec2) {
        let (Some(selection_id), Some(last), Some(point)) =
            (self.moving, self.last, to_grid_point(position))
        else {
            return;
        };
        let (dx, dy) = (point.x.value() - last.x.value(), point.y.value() - last.y.value());
        if dx == 0 && dy == 0 {
            return;
        }

        let selection = modifier.selection(selection_id).clone();
        if !modifier.new_positions_representable(&selection, dx, dy) {
            return;
        }
        modifier.move_or_delete_temporary_consuming(selection, dx, dy);
        // Kreuzungspunkte wandern mit der Selektion
        self.cross_points = std::mem::take(&mut self.cross_points)
            .into_iter()
            .filter_map(|cross_point| cross_point.checked_offset(dx, dy))
            .collect();
        self.last = Some(point);
    }

    fn release(&mut self, modifier: &mut Modifier) {
        if let Some(selection_id) = self.moving.take() {
            let selection = modifier.selection(selection_id).clone();
            let split_points = modifier.get_temporary_selection_splitpoints(&selection);
            modifier.split_temporary_segments(&selection, &split_points);

            let selection = modifier.selection(selection_id).clone();
            let cross_points = std::mem::take(&mut self.cross_points);
            modifier.regularize_temporary_selection(&selection, Some(cross_points));

            let selection = modifier.selection(selection_id).clone();
            modifier.destroy_selection(selection_id);
            modifier.change_insertion_mode_consuming(selection, InsertionMode::InsertOrDiscard);
        }
        self.last = None;
        modifier.finish_undo_group();
    }
}

// ── Griffe ──────────────────────────────────────────────────────────

/// Ändert die Eingangszahl eines Logikelements durch vertikales Ziehen.
#[derive(Debug, Clone)]
pub struct ResizeHandleTool {
    original: LogicItemDefinition,
    position: Point,
    current: Option<LogicItemId>,
    start_y: Option<f32>,
    input_count: usize,
}

impl ResizeHandleTool {
    pub fn new(modifier: &Modifier, logicitem_id: LogicItemId) -> Self {
        let logicitem = modifier.layout().logicitem(logicitem_id);
        Self {
            original: logicitem.definition.clone(),
            position: logicitem.position,
            current: Some(logicitem_id),
            start_y: None,
            input_count: logicitem.definition.input_count,
        }
    }

    fn resized(&self, input_count: usize) -> LogicItemDefinition {
        let mut definition = self.original.clone();
        definition.input_count = input_count;
        definition.input_inverters.resize(input_count, false);
        definition
    }

    fn press(&mut self, modifier: &mut Modifier, position: Vec2) {
        let Some(logicitem_id) = self.current else {
            return;
        };
        modifier.begin_undo_group();
        self.current =
            modifier.change_logicitem_insertion_mode(logicitem_id, InsertionMode::Temporary);
        self.start_y = Some(position.y);
    }

    fn drag(&mut self, modifier: &mut Modifier, position: Vec2) {
        let (Some(logicitem_id), Some(start_y)) = (self.current, self.start_y) else {
            return;
        };
        let (min, max) = self.original.logicitem_type.input_range();
        let delta = (position.y - start_y).round() as i64;
        let input_count =
            (self.original.input_count as i64 + delta).clamp(min as i64, max as i64) as usize;
        if input_count == self.input_count {
            return;
        }

        modifier.delete_temporary_logicitem(logicitem_id);
        self.current = modifier.add_logicitem(
            self.resized(input_count),
            self.position,
            InsertionMode::Temporary,
        );
        self.input_count = input_count;
    }

    fn release(&mut self, modifier: &mut Modifier) {
        let Some(logicitem_id) = self.current.take() else {
            modifier.finish_undo_group();
            return;
        };

        let checked = modifier.change_logicitem_insertion_mode(logicitem_id, InsertionMode::Collisions);
        let colliding = checked.is_some_and(|id| {
            modifier.layout().logicitem(id).display_state == DisplayState::Colliding
        });

        let final_id = match checked {
            Some(id) if colliding => {
                // zurück zur ursprünglichen Größe
                let id = modifier.change_logicitem_insertion_mode(id, InsertionMode::Temporary);
                if let Some(id) = id {
                    modifier.delete_temporary_logicitem(id);
                }
                modifier.add_logicitem(
                    self.original.clone(),
                    self.position,
                    InsertionMode::InsertOrDiscard,
                )
            }
            Some(id) => modifier.change_logicitem_insertion_mode(id, InsertionMode::InsertOrDiscard),
            None => None,
        };

        if let Some(id) = final_id {
            let mut selection = Selection::new();
            selection.add_logicitem(id);
            modifier.add_to_visible_selection(&selection);
        }
        self.current = final_id;
        self.start_y = None;
        modifier.finish_undo_group();
    }
}

/// Griff, der beim Loslassen die Einstellungen eines Elements öffnet.
#[derive(Debug, Clone)]
pub struct SettingHandleTool {
    target: SettingTarget,
    pressed: Option<Vec2>,
}

impl SettingHandleTool {
    pub fn new(target: SettingTarget) -> Self {
        Self {
            target,
            pressed: None,
        }
    }

    fn press(&mut self, position: Vec2) {
        self.pressed = Some(position);
    }

    fn release(&mut self, position: Vec2) -> Option<SettingTarget> {
        let pressed = self.pressed.take()?;
        pick_rect(pressed)
            .contains(position)
            .then_some(self.target)
    }
}

// ── Summentyp ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum MouseTool {
    InsertLogicItem(InsertLogicItemTool),
    InsertWire(InsertWireTool),
    InsertDecoration(InsertDecorationTool),
    SelectArea(SelectAreaTool),
    SelectSingle(SelectSingleTool),
    SelectMove(SelectMoveTool),
    ResizeHandle(ResizeHandleTool),
    SettingHandle(SettingHandleTool),
}

impl MouseTool {
    pub fn press(&mut self, modifier: &mut Modifier, position: Vec2) {
        match self {
            MouseTool::InsertLogicItem(tool) => tool.press(modifier, position),
            MouseTool::InsertWire(tool) => tool.press(modifier, position),
            MouseTool::InsertDecoration(tool) => tool.press(modifier, position),
            MouseTool::SelectArea(tool) => tool.press(modifier, position),
            MouseTool::SelectSingle(tool) => tool.press(modifier, position),
            MouseTool::SelectMove(tool) => tool.press(modifier, position),
            MouseTool::ResizeHandle(tool) => tool.press(modifier, position),
            MouseTool::SettingHandle(tool) => tool.press(position),
        }
    }

    pub fn drag(&mut self, modifier: &mut Modifier, position: Vec2) {
        match self {
            MouseTool::InsertLogicItem(tool) => tool.drag(modifier, position),
            MouseTool::InsertWire(tool) => tool.drag(modifier, position),
            MouseTool::InsertDecoration(tool) => tool.drag(modifier, position),
            MouseTool::SelectArea(tool) => tool.drag(modifier, position),
            MouseTool::SelectMove(tool) => tool.drag(modifier, position),
            MouseTool::ResizeHandle(tool) => tool.drag(modifier, position),
            MouseTool::SelectSingle(_) | MouseTool::SettingHandle(_) => {}
        }
    }

    /// Beendet die Geste. Nur der Einstellungsgriff liefert ein Ziel.
    pub fn release(&mut self, modifier: &mut Modifier, position: Vec2) -> Option<SettingTarget> {
        match self {
            MouseTool::InsertLogicItem(tool) => tool.release(modifier),
            MouseTool::InsertWire(tool) => tool.release(modifier),
            MouseTool::InsertDecoration(tool) => tool.release(modifier),
            MouseTool::SelectArea(tool) => tool.release(modifier),
            MouseTool::SelectSingle(tool) => tool.release(modifier),
            MouseTool::SelectMove(tool) => tool.release(modifier),
            MouseTool::ResizeHandle(tool) => tool.release(modifier),
            MouseTool::SettingHandle(tool) => return tool.release(position),
        }
        None
    }

    pub fn name(&self) -> &'static str {
        match self {
            MouseTool::InsertLogicItem(_) => "Logikelement einfügen",
            MouseTool::InsertWire(_) => "Leitung einfügen",
            MouseTool::InsertDecoration(_) => "Dekoration einfügen",
            MouseTool::SelectArea(_) => "Bereich auswählen",
            MouseTool::SelectSingle(_) => "Element auswählen",
            MouseTool::SelectMove(_) => "Auswahl verschieben",
            MouseTool::ResizeHandle(_) => "Größe ändern",
            MouseTool::SettingHandle(_) => "Einstellungen",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modifier::ModifierConfig;
    use crate::core::geometry::Orientation;
    use crate::core::{LogicItemType, OrderedLine};

    fn validating() -> Modifier {
        Modifier::new(ModifierConfig {
            validate_messages: true,
            ..ModifierConfig::default()
        })
    }

    #[test]
    fn grid_point_rounds_and_rejects_overflow() {
        assert_eq!(to_grid_point(Vec2::new(1.4, 2.6)), Some(Point::new(1, 3)));
        assert_eq!(to_grid_point(Vec2::new(1.0e6, 0.0)), None);
    }

    #[test]
    fn wire_tool_inserts_l_shape_in_one_group() {
        let mut modifier = validating();
        let mut tool = MouseTool::InsertWire(InsertWireTool::new());

        tool.press(&mut modifier, Vec2::new(0.0, 0.0));
        tool.drag(&mut modifier, Vec2::new(3.0, 1.0));
        tool.drag(&mut modifier, Vec2::new(5.0, 4.0));
        tool.release(&mut modifier, Vec2::new(5.0, 4.0));

        assert_eq!(modifier.undo_groups_count(), 1);
        assert_eq!(modifier.layout().segment_count(), 2);
        let mut lines: Vec<OrderedLine> = modifier
            .layout()
            .segments()
            .map(|segment| modifier.layout().line(segment))
            .collect();
        lines.sort();
        assert_eq!(
            lines,
            vec![
                OrderedLine::from_points(Point::new(0, 0), Point::new(5, 0)),
                OrderedLine::from_points(Point::new(5, 0), Point::new(5, 4)),
            ]
        );

        modifier.undo_group();
        assert!(modifier.layout().is_empty());
    }

    #[test]
    fn logicitem_tool_follows_drag() {
        let mut modifier = validating();
        let definition = LogicItemDefinition::new(LogicItemType::AndElement, 2, Orientation::Right);
        let mut tool = MouseTool::InsertLogicItem(InsertLogicItemTool::new(definition));

        tool.press(&mut modifier, Vec2::new(1.0, 1.0));
        tool.drag(&mut modifier, Vec2::new(4.2, 6.8));
        tool.release(&mut modifier, Vec2::new(4.2, 6.8));

        assert_eq!(modifier.layout().logicitem_count(), 1);
        let logicitem = modifier.layout().logicitem(LogicItemId(0));
        assert_eq!(logicitem.position, Point::new(4, 7));
        assert_eq!(logicitem.display_state, DisplayState::Normal);
        assert_eq!(modifier.undo_groups_count(), 1);
    }

    #[test]
    fn select_move_shifts_inserted_wire() {
        let mut modifier = validating();
        modifier
            .add_wire_segment(
                OrderedLine::from_points(Point::new(0, 0), Point::new(4, 0)),
                InsertionMode::InsertOrDiscard,
            )
            .expect("Segment erwartet");

        let mut area = MouseTool::SelectArea(SelectAreaTool::new(SelectionFunction::Add, false));
        area.press(&mut modifier, Vec2::new(-1.0, -1.0));
        area.drag(&mut modifier, Vec2::new(5.0, 1.0));
        area.release(&mut modifier, Vec2::new(5.0, 1.0));

        let mut mover = MouseTool::SelectMove(SelectMoveTool::new());
        mover.press(&mut modifier, Vec2::new(2.0, 0.0));
        mover.drag(&mut modifier, Vec2::new(2.0, 3.0));
        mover.release(&mut modifier, Vec2::new(2.0, 3.0));

        let segments: Vec<_> = modifier.layout().segments().collect();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].wire_id.is_inserted());
        assert_eq!(
            modifier.layout().line(segments[0]),
            OrderedLine::from_points(Point::new(0, 3), Point::new(4, 3))
        );
    }

    #[test]
    fn select_move_keeps_cross_point_connected() {
        let mut modifier = validating();
        for (p0, p1) in [
            (Point::new(0, 5), Point::new(10, 5)),
            (Point::new(5, 0), Point::new(5, 10)),
        ] {
            modifier.add_wire_segment(
                OrderedLine::from_points(p0, p1),
                InsertionMode::InsertOrDiscard,
            );
        }
        modifier.toggle_wire_crosspoint(Point::new(5, 5));
        assert!(modifier
            .index()
            .collision_index()
            .is_wire_cross_point(Point::new(5, 5)));
        assert_eq!(modifier.layout().inserted_wire_ids().count(), 1);

        let mut area = MouseTool::SelectArea(SelectAreaTool::new(SelectionFunction::Add, false));
        area.press(&mut modifier, Vec2::new(-1.0, -1.0));
        area.drag(&mut modifier, Vec2::new(11.0, 11.0));
        area.release(&mut modifier, Vec2::new(11.0, 11.0));

        let mut mover = MouseTool::SelectMove(SelectMoveTool::new());
        mover.press(&mut modifier, Vec2::new(5.0, 5.0));
        mover.drag(&mut modifier, Vec2::new(6.0, 6.0));
        mover.drag(&mut modifier, Vec2::new(8.0, 7.0));
        mover.release(&mut modifier, Vec2::new(8.0, 7.0));

        let collision_index = modifier.index().collision_index();
        assert!(collision_index.is_wire_cross_point(Point::new(8, 7)));
        assert!(!collision_index.is_wire_cross_point(Point::new(5, 5)));
        assert_eq!(modifier.layout().inserted_wire_ids().count(), 1);
        assert_eq!(modifier.layout().segment_count(), 4);
    }

    #[test]
    fn setting_handle_reports_target_on_click() {
        let mut modifier = validating();
        let target = SettingTarget::LogicItem(LogicItemId(0));
        let mut tool = MouseTool::SettingHandle(SettingHandleTool::new(target));

        tool.press(&mut modifier, Vec2::new(1.0, 1.0));
        assert_eq!(tool.release(&mut modifier, Vec2::new(1.1, 1.0)), Some(target));

        tool.press(&mut modifier, Vec2::new(1.0, 1.0));
        assert_eq!(tool.release(&mut modifier, Vec2::new(3.0, 1.0)), None);
    }
}
