//! Belegung der Gitterpunkte durch eingefügte Elemente.
//!
//! Jeder Punkt hält getrennte Slots für Körper, Anschlüsse und Leitungsteile.
//! Aus der Kombination belegter Slots ergibt sich der Zustand des Punktes.

use std::collections::HashMap;

use crate::core::decoration::DecorationData;
use crate::core::geometry::OrderedLine;
use crate::core::grid::Point;
use crate::core::ids::{DecorationId, LogicItemId, WireId};
use crate::core::logicitem::LogicItemData;
use crate::core::message::InfoMessage;
use crate::core::segment_tree::{SegmentInfo, SegmentPointType};

/// Besitzer eines Körperpunktes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyOwner {
    LogicItem(LogicItemId),
    Decoration(DecorationId),
}

/// Art eines Punktes, der registriert oder geprüft wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    LogicItemBody,
    LogicItemConnection,
    DecorationBody,
    WireConnection,
    WireHorizontal,
    WireVertical,
    WireCornerPoint,
    WireCrossPoint,
    WireNewUnknownPoint,
}

/// Belegung eines Gitterpunktes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionData {
    pub body: Option<BodyOwner>,
    pub logicitem_connection: Option<LogicItemId>,
    pub wire_connection: Option<WireId>,
    pub wire_horizontal: Option<WireId>,
    pub wire_vertical: Option<WireId>,
    pub wire_corner: Option<WireId>,
    pub wire_cross: Option<WireId>,
}

impl CollisionData {
    pub fn is_empty(&self) -> bool {
        *self == CollisionData::default()
    }

    fn only(&self, expected: CollisionData) -> bool {
        *self == expected
    }

    pub fn is_logicitem_body(&self) -> bool {
        matches!(self.body, Some(BodyOwner::LogicItem(_)))
            && self.only(CollisionData {
                body: self.body,
                ..Default::default()
            })
    }

    pub fn is_decoration(&self) -> bool {
        matches!(self.body, Some(BodyOwner::Decoration(_)))
            && self.only(CollisionData {
                body: self.body,
                ..Default::default()
            })
    }

    pub fn is_logicitem_connection(&self) -> bool {
        self.logicitem_connection.is_some()
            && self.only(CollisionData {
                logicitem_connection: self.logicitem_connection,
                ..Default::default()
            })
    }

    pub fn is_wire_connection(&self) -> bool {
        self.wire_connection.is_some()
            && self.only(CollisionData {
                wire_connection: self.wire_connection,
                ..Default::default()
            })
    }

    pub fn is_wire_horizontal(&self) -> bool {
        self.wire_horizontal.is_some()
            && self.only(CollisionData {
                wire_horizontal: self.wire_horizontal,
                ..Default::default()
            })
    }

    pub fn is_wire_vertical(&self) -> bool {
        self.wire_vertical.is_some()
            && self.only(CollisionData {
                wire_vertical: self.wire_vertical,
                ..Default::default()
            })
    }

    pub fn is_wire_corner_point(&self) -> bool {
        self.wire_corner.is_some()
            && self.only(CollisionData {
                wire_corner: self.wire_corner,
                ..Default::default()
            })
    }

    pub fn is_wire_cross_point(&self) -> bool {
        self.wire_cross.is_some()
            && self.only(CollisionData {
                wire_cross: self.wire_cross,
                ..Default::default()
            })
    }

    /// Zwei Leitungen kreuzen sich ohne Verbindung.
    pub fn is_wire_crossing(&self) -> bool {
        self.wire_horizontal.is_some()
            && self.wire_vertical.is_some()
            && self.only(CollisionData {
                wire_horizontal: self.wire_horizontal,
                wire_vertical: self.wire_vertical,
                ..Default::default()
            })
    }

    /// Logikelement-Anschluss mit angeschlossener Leitung.
    pub fn is_logicitem_wire_connection(&self) -> bool {
        self.logicitem_connection.is_some()
            && self.wire_connection.is_some()
            && self.only(CollisionData {
                logicitem_connection: self.logicitem_connection,
                wire_connection: self.wire_connection,
                ..Default::default()
            })
    }

    /// Erste Leitung, die den Punkt belegt.
    pub fn first_wire(&self) -> Option<WireId> {
        self.wire_horizontal
            .or(self.wire_vertical)
            .or(self.wire_connection)
            .or(self.wire_corner)
            .or(self.wire_cross)
    }

    /// Würde ein neuer Punkt dieser Art hier kollidieren?
    pub fn is_colliding_with(&self, item_type: ItemType) -> bool {
        if self.is_empty() {
            return false;
        }
        match item_type {
            ItemType::LogicItemBody
            | ItemType::DecorationBody
            | ItemType::WireCornerPoint
            | ItemType::WireCrossPoint => true,
            ItemType::LogicItemConnection => !self.is_wire_connection(),
            ItemType::WireConnection => !self.is_logicitem_connection(),
            ItemType::WireHorizontal => !self.is_wire_vertical(),
            ItemType::WireVertical => !self.is_wire_horizontal(),
            ItemType::WireNewUnknownPoint => {
                self.is_logicitem_body()
                    || self.is_decoration()
                    || self.is_logicitem_wire_connection()
                    || self.is_wire_crossing()
            }
        }
    }
}

fn check_and_set<T: PartialEq + Copy + std::fmt::Debug>(
    slot: &mut Option<T>,
    verify_old: Option<T>,
    new: Option<T>,
    position: Point,
) {
    assert!(
        *slot == verify_old,
        "unerwarteter Kollisionszustand bei {position}: {slot:?} statt {verify_old:?}"
    );
    *slot = new;
}

/// Kollisionspunkte eines Logikelements.
pub fn logicitem_collision_points(data: &LogicItemData) -> Vec<(Point, ItemType)> {
    data.inputs()
        .into_iter()
        .chain(data.outputs())
        .map(|connector| (connector.position, ItemType::LogicItemConnection))
        .chain(
            data.body_points()
                .into_iter()
                .map(|point| (point, ItemType::LogicItemBody)),
        )
        .collect()
}

fn endpoint_item_type(kind: SegmentPointType) -> Option<ItemType> {
    match kind {
        SegmentPointType::Input | SegmentPointType::Output => Some(ItemType::WireConnection),
        SegmentPointType::CornerPoint => Some(ItemType::WireCornerPoint),
        SegmentPointType::CrossPoint => Some(ItemType::WireCrossPoint),
        SegmentPointType::ShadowPoint => None,
        SegmentPointType::NewUnknown => Some(ItemType::WireNewUnknownPoint),
    }
}

/// Kollisionspunkte der Endpunkte eines Segments; Schattenpunkte zählen nicht.
pub fn segment_end_points(info: &SegmentInfo) -> Vec<(Point, ItemType)> {
    let mut result = Vec::with_capacity(2);
    if let Some(item_type) = endpoint_item_type(info.p0_type) {
        result.push((info.line.p0, item_type));
    }
    if let Some(item_type) = endpoint_item_type(info.p1_type) {
        result.push((info.line.p1, item_type));
    }
    result
}

/// Alle Kollisionspunkte eines Segments.
pub fn segment_collision_points(info: &SegmentInfo) -> Vec<(Point, ItemType)> {
    let inner_type = if info.line.is_horizontal() {
        ItemType::WireHorizontal
    } else {
        ItemType::WireVertical
    };
    let mut result: Vec<(Point, ItemType)> = info
        .line
        .inner_points()
        .map(|point| (point, inner_type))
        .collect();
    result.extend(segment_end_points(info));
    result
}

/// Punktbelegung aller eingefügten Elemente.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollisionIndex {
    map: HashMap<Point, CollisionData>,
}

impl CollisionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Belegung eines Punktes, leer wenn unbelegt.
    pub fn query(&self, point: Point) -> CollisionData {
        self.map.get(&point).copied().unwrap_or_default()
    }

    pub fn first_wire(&self, point: Point) -> Option<WireId> {
        self.map.get(&point).and_then(CollisionData::first_wire)
    }

    pub fn is_wires_crossing(&self, point: Point) -> bool {
        self.query(point).is_wire_crossing()
    }

    pub fn is_wire_cross_point(&self, point: Point) -> bool {
        self.query(point).is_wire_cross_point()
    }

    fn state_colliding(&self, point: Point, item_type: ItemType) -> bool {
        self.map
            .get(&point)
            .is_some_and(|data| data.is_colliding_with(item_type))
    }

    pub fn is_colliding_logicitem(&self, data: &LogicItemData) -> bool {
        logicitem_collision_points(data)
            .into_iter()
            .any(|(point, item_type)| self.state_colliding(point, item_type))
    }

    pub fn is_colliding_decoration(&self, data: &DecorationData) -> bool {
        data.body_points()
            .into_iter()
            .any(|point| self.state_colliding(point, ItemType::DecorationBody))
    }

    /// Kollisionstest einer neuen Linie mit unbekannten Endpunkten.
    pub fn is_colliding_line(&self, line: OrderedLine) -> bool {
        let info = SegmentInfo {
            line,
            p0_type: SegmentPointType::NewUnknown,
            p1_type: SegmentPointType::NewUnknown,
        };
        segment_collision_points(&info)
            .into_iter()
            .any(|(point, item_type)| self.state_colliding(point, item_type))
    }

    // ── Registrierung ───────────────────────────────────────────────

    fn update_point(&mut self, point: Point, func: impl FnOnce(&mut CollisionData)) {
        let data = self.map.entry(point).or_default();
        func(data);
        if data.is_empty() {
            self.map.remove(&point);
        }
    }

    fn set_logicitem(
        &mut self,
        data: &LogicItemData,
        verify_old: Option<LogicItemId>,
        new: Option<LogicItemId>,
    ) {
        for (point, item_type) in logicitem_collision_points(data) {
            self.update_point(point, |entry| match item_type {
                ItemType::LogicItemBody => check_and_set(
                    &mut entry.body,
                    verify_old.map(BodyOwner::LogicItem),
                    new.map(BodyOwner::LogicItem),
                    point,
                ),
                _ => check_and_set(&mut entry.logicitem_connection, verify_old, new, point),
            });
        }
    }

    fn set_decoration(
        &mut self,
        data: &DecorationData,
        verify_old: Option<DecorationId>,
        new: Option<DecorationId>,
    ) {
        for point in data.body_points() {
            self.update_point(point, |entry| {
                check_and_set(
                    &mut entry.body,
                    verify_old.map(BodyOwner::Decoration),
                    new.map(BodyOwner::Decoration),
                    point,
                )
            });
        }
    }

    fn set_wire_points(
        &mut self,
        points: Vec<(Point, ItemType)>,
        verify_old: Option<WireId>,
        new: Option<WireId>,
    ) {
        for (point, item_type) in points {
            self.update_point(point, |entry| {
                let slot = match item_type {
                    ItemType::WireConnection => &mut entry.wire_connection,
                    ItemType::WireHorizontal => &mut entry.wire_horizontal,
                    ItemType::WireVertical => &mut entry.wire_vertical,
                    ItemType::WireCornerPoint => &mut entry.wire_corner,
                    ItemType::WireCrossPoint => &mut entry.wire_cross,
                    other => panic!("{other:?} ist kein registrierbarer Leitungspunkt"),
                };
                check_and_set(slot, verify_old, new, point);
            });
        }
    }

    pub fn submit(&mut self, message: &InfoMessage) {
        match message {
            InfoMessage::LogicItemInserted { logicitem_id, data } => {
                self.set_logicitem(data, None, Some(*logicitem_id))
            }
            InfoMessage::InsertedLogicItemIdUpdated {
                new_logicitem_id,
                old_logicitem_id,
                data,
            } => self.set_logicitem(data, Some(*old_logicitem_id), Some(*new_logicitem_id)),
            InfoMessage::LogicItemUninserted { logicitem_id, data } => {
                self.set_logicitem(data, Some(*logicitem_id), None)
            }

            InfoMessage::DecorationInserted {
                decoration_id,
                data,
            } => self.set_decoration(data, None, Some(*decoration_id)),
            InfoMessage::InsertedDecorationIdUpdated {
                new_decoration_id,
                old_decoration_id,
                data,
            } => self.set_decoration(data, Some(*old_decoration_id), Some(*new_decoration_id)),
            InfoMessage::DecorationUninserted {
                decoration_id,
                data,
            } => self.set_decoration(data, Some(*decoration_id), None),

            InfoMessage::SegmentInserted { segment, info } => {
                self.set_wire_points(segment_collision_points(info), None, Some(segment.wire_id))
            }
            InfoMessage::InsertedSegmentIdUpdated {
                new_segment,
                old_segment,
                info,
            } => {
                if new_segment.wire_id != old_segment.wire_id {
                    self.set_wire_points(
                        segment_collision_points(info),
                        Some(old_segment.wire_id),
                        Some(new_segment.wire_id),
                    );
                }
            }
            InfoMessage::InsertedEndPointsUpdated {
                segment,
                new_info,
                old_info,
            } => {
                self.set_wire_points(segment_end_points(old_info), Some(segment.wire_id), None);
                self.set_wire_points(segment_end_points(new_info), None, Some(segment.wire_id));
            }
            InfoMessage::SegmentUninserted { segment, info } => {
                self.set_wire_points(segment_collision_points(info), Some(segment.wire_id), None)
            }
            _ => {}
        }
    }

    /// Sortierte Einträge für Vergleiche.
    pub fn entries(&self) -> Vec<(Point, CollisionData)> {
        let mut result: Vec<(Point, CollisionData)> =
            self.map.iter().map(|(point, data)| (*point, *data)).collect();
        result.sort_by_key(|(point, _)| *point);
        result
    }
}
