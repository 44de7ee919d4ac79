//! Öffentliche Fassade der Editier-Engine.
//!
//! Der [`Modifier`] besitzt die [`CircuitData`], bietet die Editier-API an und
//! wacht über die Undo-Gruppen: außerhalb einer offenen Gruppe darf der
//! Undo-Stack keine ungruppierten Einträge enthalten.

use anyhow::ensure;

use crate::core::{
    DecorationDefinition, DecorationId, Endpoints, InsertionMode, KeyIndex, Layout, LayoutIndex,
    LineInsertionType, LogicItemDefinition, LogicItemId, OrderedLine, Point, RectFine, Segment,
    SegmentPart, Selection, WireId,
};
use crate::shared::options::EngineOptions;

use super::circuit_data::CircuitData;
use super::editing::{decoration, history, logicitem, visible_selection, wire, wire_detail};
use super::key_state::LayoutKeyState;
use super::message_log::MessageLog;
use super::selection_store::SelectionId;
use super::visible_selection::{selection_in_rect, SelectionFunction};

/// Laufzeitschalter des Modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierConfig {
    pub enable_history: bool,
    pub store_messages: bool,
    /// Nach jedem Aufruf Indizes und Selektionen gegen einen Neuaufbau prüfen
    pub validate_messages: bool,
    pub message_log_capacity: usize,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self::from(&EngineOptions::default())
    }
}

impl From<&EngineOptions> for ModifierConfig {
    fn from(options: &EngineOptions) -> Self {
        Self {
            enable_history: options.enable_history,
            store_messages: options.store_messages,
            validate_messages: options.validate_messages,
            message_log_capacity: options.message_log_capacity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Modifier {
    circuit: CircuitData,
    config: ModifierConfig,
    group_open: bool,
}

impl Default for Modifier {
    fn default() -> Self {
        Self::new(ModifierConfig::default())
    }
}

impl Modifier {
    pub fn new(config: ModifierConfig) -> Self {
        Self::from_circuit_data(CircuitData::new(), config)
    }

    /// Übernimmt ein bestehendes Layout, alle Indizes werden neu aufgebaut.
    pub fn from_layout(layout: Layout, config: ModifierConfig) -> Self {
        Self::from_circuit_data(CircuitData::from_layout(layout), config)
    }

    fn from_circuit_data(mut circuit: CircuitData, config: ModifierConfig) -> Self {
        if config.store_messages {
            circuit.message_log = Some(MessageLog::new(config.message_log_capacity));
        }
        if config.enable_history {
            circuit.history.enable();
        }
        log::debug!("Modifier erstellt: {config:?}");

        Self {
            circuit,
            config,
            group_open: false,
        }
    }

    // ── Zugriff ─────────────────────────────────────────────────────

    pub fn config(&self) -> ModifierConfig {
        self.config
    }

    pub fn circuit_data(&self) -> &CircuitData {
        &self.circuit
    }

    pub fn layout(&self) -> &Layout {
        &self.circuit.layout
    }

    pub fn index(&self) -> &LayoutIndex {
        &self.circuit.index
    }

    pub fn keys(&self) -> &KeyIndex {
        &self.circuit.keys
    }

    pub fn message_log(&self) -> Option<&MessageLog> {
        self.circuit.message_log.as_ref()
    }

    /// Gibt das Layout heraus, z. B. an die Simulation.
    pub fn into_layout(self) -> Layout {
        self.circuit.layout
    }

    pub fn layout_key_state(&self) -> LayoutKeyState {
        LayoutKeyState::from_layout(&self.circuit.layout, &self.circuit.keys)
    }

    // ── Invarianten ─────────────────────────────────────────────────

    /// Vergleicht alle abgeleiteten Zustände mit einem Neuaufbau aus dem Layout.
    pub fn validate(&self) -> anyhow::Result<()> {
        let circuit = &self.circuit;
        let layout = &circuit.layout;

        ensure!(
            circuit.index.same_content(&LayoutIndex::from_layout(layout)),
            "LayoutIndex weicht vom Neuaufbau ab"
        );
        ensure!(
            circuit.keys.is_consistent(layout),
            "Schlüssel passen nicht zum Layout"
        );
        ensure!(
            circuit.selection_store.all_valid(layout),
            "Selektion verweist auf gelöschte Elemente"
        );
        ensure!(
            circuit.visible_selection.is_valid(layout),
            "sichtbare Selektion verweist auf gelöschte Elemente"
        );

        for wire_id in layout.inserted_wire_ids() {
            let tree = layout.segment_tree(wire_id);
            ensure!(!tree.is_empty(), "Leitung {wire_id} ist leer");
            ensure!(tree.is_connected(), "Leitung {wire_id} ist nicht zusammenhängend");
            ensure!(
                tree.input_count() <= 1,
                "Leitung {wire_id} hat {} Eingänge",
                tree.input_count()
            );
        }
        for (segment_index, info) in layout.segment_tree(WireId::TEMPORARY).iter() {
            ensure!(
                info.endpoints().valid_for_temporary(),
                "temporäres Segment {segment_index} hat Endpunkte {:?}",
                info.endpoints()
            );
        }
        Ok(())
    }

    fn check_entry(&self) {
        assert!(
            self.group_open || !self.circuit.history.has_ungrouped_undo_entries(),
            "ungruppierte Undo-Einträge außerhalb einer offenen Gruppe"
        );
    }

    /// Abschluss jedes ändernden Aufrufs.
    fn finish_call(&mut self) {
        if !self.group_open {
            self.circuit.history.finish_undo_group();
        }
        if self.config.validate_messages {
            if let Err(error) = self.validate() {
                panic!("Validierung fehlgeschlagen: {error:#}");
            }
        }
    }

    fn modify<T>(&mut self, operation: impl FnOnce(&mut CircuitData) -> T) -> T {
        self.check_entry();
        let result = operation(&mut self.circuit);
        self.finish_call();
        result
    }

    // ── Logikelemente ───────────────────────────────────────────────

    pub fn add_logicitem(
        &mut self,
        definition: LogicItemDefinition,
        position: Point,
        mode: InsertionMode,
    ) -> Option<LogicItemId> {
        self.modify(|circuit| logicitem::add_logicitem(circuit, definition, position, mode))
    }

    pub fn delete_temporary_logicitem(&mut self, logicitem_id: LogicItemId) {
        self.modify(|circuit| logicitem::delete_temporary_logicitem(circuit, logicitem_id))
    }

    pub fn is_logicitem_position_representable(
        &self,
        logicitem_id: LogicItemId,
        dx: i32,
        dy: i32,
    ) -> bool {
        logicitem::is_logicitem_position_representable(&self.circuit, logicitem_id, dx, dy)
    }

    pub fn move_temporary_logicitem_unchecked(&mut self, logicitem_id: LogicItemId, dx: i32, dy: i32) {
        self.modify(|circuit| {
            logicitem::move_temporary_logicitem_unchecked(circuit, logicitem_id, dx, dy)
        })
    }

    /// `false`, wenn das Element nicht darstellbar war und gelöscht wurde.
    pub fn move_or_delete_temporary_logicitem(
        &mut self,
        logicitem_id: LogicItemId,
        dx: i32,
        dy: i32,
    ) -> bool {
        self.modify(|circuit| {
            logicitem::move_or_delete_temporary_logicitem(circuit, logicitem_id, dx, dy)
        })
    }

    pub fn change_logicitem_insertion_mode(
        &mut self,
        logicitem_id: LogicItemId,
        new_mode: InsertionMode,
    ) -> Option<LogicItemId> {
        self.modify(|circuit| {
            logicitem::change_logicitem_insertion_mode(circuit, logicitem_id, new_mode)
        })
    }

    /// Invertiert den gerichteten Anschluss an `point`, falls vorhanden.
    pub fn toggle_inverter(&mut self, point: Point) {
        self.modify(|circuit| logicitem::toggle_inverter(circuit, point))
    }

    // ── Dekorationen ────────────────────────────────────────────────

    pub fn add_decoration(
        &mut self,
        definition: DecorationDefinition,
        position: Point,
        mode: InsertionMode,
    ) -> Option<DecorationId> {
        self.modify(|circuit| decoration::add_decoration(circuit, definition, position, mode))
    }

    pub fn delete_temporary_decoration(&mut self, decoration_id: DecorationId) {
        self.modify(|circuit| decoration::delete_temporary_decoration(circuit, decoration_id))
    }

    pub fn move_temporary_decoration_unchecked(
        &mut self,
        decoration_id: DecorationId,
        dx: i32,
        dy: i32,
    ) {
        self.modify(|circuit| {
            decoration::move_temporary_decoration_unchecked(circuit, decoration_id, dx, dy)
        })
    }

    pub fn move_or_delete_temporary_decoration(
        &mut self,
        decoration_id: DecorationId,
        dx: i32,
        dy: i32,
    ) -> bool {
        self.modify(|circuit| {
            decoration::move_or_delete_temporary_decoration(circuit, decoration_id, dx, dy)
        })
    }

    pub fn change_decoration_insertion_mode(
        &mut self,
        decoration_id: DecorationId,
        new_mode: InsertionMode,
    ) -> Option<DecorationId> {
        self.modify(|circuit| {
            decoration::change_decoration_insertion_mode(circuit, decoration_id, new_mode)
        })
    }

    pub fn set_decoration_text(&mut self, decoration_id: DecorationId, text: String) {
        self.modify(|circuit| decoration::set_decoration_text(circuit, decoration_id, text))
    }

    // ── Leitungen ───────────────────────────────────────────────────

    pub fn add_wire_segment(
        &mut self,
        line: OrderedLine,
        mode: InsertionMode,
    ) -> Option<SegmentPart> {
        self.modify(|circuit| wire::add_wire_segment(circuit, line, mode))
    }

    /// L-förmige Leitung von `p0` nach `p1`.
    pub fn add_wire_segments(
        &mut self,
        p0: Point,
        p1: Point,
        kind: LineInsertionType,
        mode: InsertionMode,
    ) -> Vec<SegmentPart> {
        self.modify(|circuit| wire::add_wire_segments(circuit, p0, p1, kind, mode))
    }

    pub fn delete_temporary_wire_segment(&mut self, segment_part: SegmentPart) {
        self.modify(|circuit| wire::delete_temporary_wire_segment(circuit, segment_part))
    }

    pub fn is_wire_position_representable(
        &self,
        segment_part: SegmentPart,
        dx: i32,
        dy: i32,
    ) -> bool {
        wire::is_wire_position_representable(&self.circuit, segment_part, dx, dy)
    }

    pub fn move_temporary_wire_unchecked(&mut self, segment_part: SegmentPart, dx: i32, dy: i32) {
        self.modify(|circuit| wire::move_temporary_wire_unchecked(circuit, segment_part, dx, dy))
    }

    pub fn move_or_delete_temporary_wire(
        &mut self,
        segment_part: SegmentPart,
        dx: i32,
        dy: i32,
    ) -> Option<SegmentPart> {
        self.modify(|circuit| wire::move_or_delete_temporary_wire(circuit, segment_part, dx, dy))
    }

    pub fn change_wire_insertion_mode(
        &mut self,
        segment_part: SegmentPart,
        new_mode: InsertionMode,
    ) -> Option<SegmentPart> {
        self.modify(|circuit| wire::change_wire_insertion_mode(circuit, segment_part, new_mode))
    }

    pub fn toggle_wire_crosspoint(&mut self, point: Point) {
        self.modify(|circuit| wire::toggle_wire_crosspoint(circuit, point))
    }

    // ── Regularisierung ─────────────────────────────────────────────

    pub fn get_inserted_cross_points(&self, selection: &Selection) -> Vec<Point> {
        wire::get_inserted_cross_points(&self.circuit, selection)
    }

    pub fn get_temporary_selection_splitpoints(&self, selection: &Selection) -> Vec<Point> {
        wire::get_temporary_selection_splitpoints(&self.circuit, selection)
    }

    pub fn split_temporary_segments(&mut self, selection: &Selection, points: &[Point]) {
        self.modify(|circuit| wire::split_temporary_segments(circuit, selection, points))
    }

    /// Setzt Kreuzungspunkte und verschmilzt kollineare Segmente, gibt die
    /// Kreuzungspunkte zurück.
    pub fn regularize_temporary_selection(
        &mut self,
        selection: &Selection,
        true_cross_points: Option<Vec<Point>>,
    ) -> Vec<Point> {
        self.modify(|circuit| {
            wire::regularize_temporary_selection(circuit, selection, true_cross_points)
        })
    }

    pub fn set_temporary_endpoints(&mut self, segment: Segment, endpoints: Endpoints) {
        self.modify(|circuit| wire::set_temporary_endpoints(circuit, segment, endpoints))
    }

    pub fn merge_uninserted_segment(&mut self, a: Segment, b: Segment) -> Segment {
        self.modify(|circuit| wire::merge_uninserted_segment(circuit, a, b))
    }

    // ── Verfolgte Selektionen ───────────────────────────────────────

    pub fn create_selection(&mut self, selection: Selection) -> SelectionId {
        self.circuit.selection_store.create(selection)
    }

    pub fn selection(&self, selection_id: SelectionId) -> &Selection {
        self.circuit.selection_store.get(selection_id)
    }

    pub fn selection_mut(&mut self, selection_id: SelectionId) -> &mut Selection {
        self.circuit.selection_store.get_mut(selection_id)
    }

    pub fn destroy_selection(&mut self, selection_id: SelectionId) {
        self.circuit.selection_store.destroy(selection_id);
    }

    pub fn selection_exists(&self, selection_id: SelectionId) -> bool {
        self.circuit.selection_store.contains(selection_id)
    }

    /// Alle Elemente, die das Rechteck berühren.
    pub fn query_selection(&self, rect: RectFine) -> Selection {
        selection_in_rect(&self.circuit.layout, &self.circuit.index, rect)
    }

    // ── Sichtbare Selektion ─────────────────────────────────────────

    /// Ausgewertete sichtbare Selektion.
    pub fn visible_selection(&self) -> Selection {
        self.circuit
            .visible_selection
            .selection(&self.circuit.layout, &self.circuit.index)
    }

    pub fn clear_visible_selection(&mut self) {
        self.modify(visible_selection::clear_visible_selection)
    }

    pub fn set_visible_selection(&mut self, selection: Selection) {
        self.modify(|circuit| visible_selection::set_visible_selection(circuit, selection))
    }

    pub fn add_visible_selection_rect(&mut self, function: SelectionFunction, rect: RectFine) {
        self.modify(|circuit| visible_selection::add_visible_selection_rect(circuit, function, rect))
    }

    pub fn update_visible_selection_rect(&mut self, rect: RectFine) {
        self.modify(|circuit| visible_selection::update_visible_selection_rect(circuit, rect))
    }

    pub fn pop_last_visible_selection_rect(&mut self) {
        self.modify(visible_selection::pop_last_visible_selection_rect)
    }

    pub fn apply_all_visible_selection_operations(&mut self) {
        self.modify(visible_selection::apply_all_visible_selection_operations)
    }

    pub fn add_to_visible_selection(&mut self, selection: &Selection) {
        self.modify(|circuit| {
            for logicitem_id in selection.selected_logicitems() {
                logicitem::add_logicitem_to_visible_selection(circuit, logicitem_id);
            }
            for decoration_id in selection.selected_decorations() {
                decoration::add_decoration_to_visible_selection(circuit, decoration_id);
            }
            for segment_part in selection.selected_segment_parts() {
                wire_detail::add_segment_to_visible_selection(circuit, segment_part);
            }
        })
    }

    pub fn remove_from_visible_selection(&mut self, selection: &Selection) {
        self.modify(|circuit| {
            for logicitem_id in selection.selected_logicitems() {
                logicitem::remove_logicitem_from_visible_selection(circuit, logicitem_id);
            }
            for decoration_id in selection.selected_decorations() {
                decoration::remove_decoration_from_visible_selection(circuit, decoration_id);
            }
            for segment_part in selection.selected_segment_parts() {
                wire_detail::remove_segment_from_visible_selection(circuit, segment_part);
            }
        })
    }

    // ── Selektionen als Ganzes ──────────────────────────────────────

    /// Ändert den Modus aller Elemente, die Selektion wird dabei verbraucht.
    pub fn change_insertion_mode_consuming(&mut self, selection: Selection, mode: InsertionMode) {
        self.modify(|circuit| change_insertion_mode_tracked(circuit, selection, mode))
    }

    pub fn new_positions_representable(&self, selection: &Selection, dx: i32, dy: i32) -> bool {
        let circuit = &self.circuit;
        selection.selected_logicitems().all(|logicitem_id| {
            logicitem::is_logicitem_position_representable(circuit, logicitem_id, dx, dy)
        }) && selection.selected_decorations().all(|decoration_id| {
            decoration::is_decoration_position_representable(circuit, decoration_id, dx, dy)
        }) && selection
            .selected_segment_parts()
            .into_iter()
            .all(|segment_part| {
                wire::is_wire_position_representable(circuit, segment_part, dx, dy)
            })
    }

    /// Verschiebt alle temporären Elemente, vorher mit
    /// [`Self::new_positions_representable`] prüfen.
    pub fn move_temporary_unchecked(&mut self, selection: &Selection, dx: i32, dy: i32) {
        self.modify(|circuit| {
            for logicitem_id in selection.selected_logicitems() {
                logicitem::move_temporary_logicitem_unchecked(circuit, logicitem_id, dx, dy);
            }
            for decoration_id in selection.selected_decorations() {
                decoration::move_temporary_decoration_unchecked(circuit, decoration_id, dx, dy);
            }
            for segment_part in selection.selected_segment_parts() {
                wire::move_temporary_wire_unchecked(circuit, segment_part, dx, dy);
            }
        })
    }

    /// Verschiebt alle temporären Elemente, nicht darstellbare werden gelöscht.
    pub fn move_or_delete_temporary_consuming(&mut self, selection: Selection, dx: i32, dy: i32) {
        self.modify(|circuit| {
            let selection_id = circuit.selection_store.create(selection);

            while let Some(logicitem_id) = circuit.selection_store.get_mut(selection_id).pop_logicitem() {
                logicitem::move_or_delete_temporary_logicitem(circuit, logicitem_id, dx, dy);
            }
            while let Some(decoration_id) =
                circuit.selection_store.get_mut(selection_id).pop_decoration()
            {
                decoration::move_or_delete_temporary_decoration(circuit, decoration_id, dx, dy);
            }
            while let Some(segment_part) =
                circuit.selection_store.get_mut(selection_id).pop_segment_part()
            {
                wire::move_or_delete_temporary_wire(circuit, segment_part, dx, dy);
            }

            circuit.selection_store.destroy(selection_id);
        })
    }

    /// Stuft alle Elemente auf temporär zurück und löscht sie.
    pub fn delete_all(&mut self, selection: Selection) {
        self.modify(|circuit| {
            let selection_id = circuit.selection_store.create(selection.clone());
            change_insertion_mode_tracked(circuit, selection, InsertionMode::Temporary);

            while let Some(logicitem_id) = circuit.selection_store.get_mut(selection_id).pop_logicitem() {
                logicitem::delete_temporary_logicitem(circuit, logicitem_id);
            }
            while let Some(decoration_id) =
                circuit.selection_store.get_mut(selection_id).pop_decoration()
            {
                decoration::delete_temporary_decoration(circuit, decoration_id);
            }
            while let Some(segment_part) =
                circuit.selection_store.get_mut(selection_id).pop_segment_part()
            {
                wire::delete_temporary_wire_segment(circuit, segment_part);
            }

            circuit.selection_store.destroy(selection_id);
        })
    }

    // ── History ─────────────────────────────────────────────────────

    pub fn enable_history(&mut self) {
        self.check_entry();
        self.circuit.history.enable();
        log::debug!("History aktiviert");
    }

    pub fn is_history_enabled(&self) -> bool {
        self.circuit.is_history_enabled()
    }

    /// Öffnet eine Gruppe für eine Benutzergeste, z. B. beim Maus-Drücken.
    pub fn begin_undo_group(&mut self) {
        self.check_entry();
        self.group_open = true;
    }

    /// Schließt die offene Gruppe. `true`, wenn sie Einträge enthielt.
    pub fn finish_undo_group(&mut self) -> bool {
        self.group_open = false;
        self.circuit.history.finish_undo_group()
    }

    /// Die folgenden Änderungen werden Teil der letzten Gruppe.
    pub fn reopen_undo_group(&mut self) {
        self.check_entry();
        self.circuit.history.reopen_undo_group();
        self.group_open = true;
    }

    pub fn undo_group(&mut self) -> bool {
        if self.group_open {
            self.finish_undo_group();
        }
        self.check_entry();
        let changed = history::undo_group(&mut self.circuit);
        self.finish_call();
        changed
    }

    pub fn redo_group(&mut self) -> bool {
        if self.group_open {
            self.finish_undo_group();
        }
        self.check_entry();
        let changed = history::redo_group(&mut self.circuit);
        self.finish_call();
        changed
    }

    pub fn has_undo(&self) -> bool {
        self.circuit.history.has_undo()
    }

    pub fn has_redo(&self) -> bool {
        self.circuit.history.has_redo()
    }

    pub fn has_ungrouped_undo_entries(&self) -> bool {
        self.circuit.history.has_ungrouped_undo_entries()
    }

    pub fn undo_groups_count(&self) -> usize {
        self.circuit.history.undo_groups_count()
    }

    pub fn is_undo_group_open(&self) -> bool {
        self.group_open
    }
}

/// Arbeitet eine verfolgte Kopie der Selektion elementweise ab.
fn change_insertion_mode_tracked(circuit: &mut CircuitData, selection: Selection, mode: InsertionMode) {
    let selection_id = circuit.selection_store.create(selection);

    while let Some(logicitem_id) = circuit.selection_store.get_mut(selection_id).pop_logicitem() {
        logicitem::change_logicitem_insertion_mode(circuit, logicitem_id, mode);
    }
    while let Some(decoration_id) = circuit.selection_store.get_mut(selection_id).pop_decoration() {
        decoration::change_decoration_insertion_mode(circuit, decoration_id, mode);
    }
    while let Some(segment_part) = circuit.selection_store.get_mut(selection_id).pop_segment_part() {
        wire::change_wire_insertion_mode(circuit, segment_part, mode);
    }

    circuit.selection_store.destroy(selection_id);
}
