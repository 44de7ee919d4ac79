//! Positions-Indizes der Anschlüsse: Logikelement-Ein/Ausgänge und Leitungs-Ein/Ausgänge.

use std::collections::HashMap;

use crate::core::geometry::Orientation;
use crate::core::grid::Point;
use crate::core::ids::{LogicItemId, Segment};
use crate::core::logicitem::{ConnectionKind, LogicItemData};
use crate::core::message::InfoMessage;
use crate::core::segment_tree::{SegmentInfo, SegmentPointType};

/// Anschluss eines eingefügten Logikelements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogicItemConnection {
    pub logicitem_id: LogicItemId,
    pub connection_id: usize,
    pub orientation: Orientation,
}

/// Endpunkt einer eingefügten Leitung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireConnection {
    pub segment: Segment,
    pub orientation: Orientation,
}

/// Position → Anschluss für Eingänge oder Ausgänge eingefügter Logikelemente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicItemConnectionIndex {
    kind: ConnectionKind,
    map: HashMap<Point, LogicItemConnection>,
}

impl LogicItemConnectionIndex {
    pub fn new(kind: ConnectionKind) -> Self {
        Self {
            kind,
            map: HashMap::new(),
        }
    }

    pub fn find(&self, position: Point) -> Option<LogicItemConnection> {
        self.map.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn connectors(&self, data: &LogicItemData) -> Vec<crate::core::logicitem::ConnectorLocation> {
        match self.kind {
            ConnectionKind::Input => data.inputs(),
            ConnectionKind::Output => data.outputs(),
        }
    }

    fn add(&mut self, logicitem_id: LogicItemId, data: &LogicItemData) {
        for connector in self.connectors(data) {
            let previous = self.map.insert(
                connector.position,
                LogicItemConnection {
                    logicitem_id,
                    connection_id: connector.connection_id,
                    orientation: connector.orientation,
                },
            );
            assert!(
                previous.is_none(),
                "Anschluss bei {} ist bereits belegt",
                connector.position
            );
        }
    }

    fn remove(&mut self, logicitem_id: LogicItemId, data: &LogicItemData) {
        for connector in self.connectors(data) {
            let removed = self.map.remove(&connector.position);
            assert!(
                removed.is_some_and(|entry| entry.logicitem_id == logicitem_id),
                "Anschluss bei {} gehört nicht zu {logicitem_id}",
                connector.position
            );
        }
    }

    fn update(&mut self, new_id: LogicItemId, old_id: LogicItemId, data: &LogicItemData) {
        for connector in self.connectors(data) {
            match self.map.get_mut(&connector.position) {
                Some(entry) if entry.logicitem_id == old_id => entry.logicitem_id = new_id,
                _ => panic!("Anschluss bei {} fehlt im Index", connector.position),
            }
        }
    }

    pub fn submit(&mut self, message: &InfoMessage) {
        match message {
            InfoMessage::LogicItemInserted { logicitem_id, data } => self.add(*logicitem_id, data),
            InfoMessage::InsertedLogicItemIdUpdated {
                new_logicitem_id,
                old_logicitem_id,
                data,
            } => self.update(*new_logicitem_id, *old_logicitem_id, data),
            InfoMessage::LogicItemUninserted { logicitem_id, data } => {
                self.remove(*logicitem_id, data)
            }
            _ => {}
        }
    }
}

/// Position → Endpunkt für Eingänge oder Ausgänge eingefügter Leitungen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireConnectionIndex {
    kind: ConnectionKind,
    map: HashMap<Point, WireConnection>,
}

impl WireConnectionIndex {
    pub fn new(kind: ConnectionKind) -> Self {
        Self {
            kind,
            map: HashMap::new(),
        }
    }

    pub fn find(&self, position: Point) -> Option<WireConnection> {
        self.map.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn point_type(&self) -> SegmentPointType {
        match self.kind {
            ConnectionKind::Input => SegmentPointType::Input,
            ConnectionKind::Output => SegmentPointType::Output,
        }
    }

    fn matching_endpoints(&self, info: &SegmentInfo) -> Vec<(Point, Orientation)> {
        let kind = self.point_type();
        let mut result = Vec::with_capacity(2);
        if info.p0_type == kind {
            result.push((info.line.p0, info.line.orientation_p0()));
        }
        if info.p1_type == kind {
            result.push((info.line.p1, info.line.orientation_p1()));
        }
        result
    }

    fn add(&mut self, segment: Segment, info: &SegmentInfo) {
        for (position, orientation) in self.matching_endpoints(info) {
            let previous = self.map.insert(
                position,
                WireConnection {
                    segment,
                    orientation,
                },
            );
            assert!(
                previous.is_none(),
                "Leitungsanschluss bei {position} ist bereits belegt"
            );
        }
    }

    fn remove(&mut self, segment: Segment, info: &SegmentInfo) {
        for (position, _) in self.matching_endpoints(info) {
            let removed = self.map.remove(&position);
            assert!(
                removed.is_some_and(|entry| entry.segment == segment),
                "Leitungsanschluss bei {position} gehört nicht zu {segment}"
            );
        }
    }

    fn update(&mut self, new_segment: Segment, old_segment: Segment, info: &SegmentInfo) {
        for (position, _) in self.matching_endpoints(info) {
            match self.map.get_mut(&position) {
                Some(entry) if entry.segment == old_segment => entry.segment = new_segment,
                _ => panic!("Leitungsanschluss bei {position} fehlt im Index"),
            }
        }
    }

    pub fn submit(&mut self, message: &InfoMessage) {
        match message {
            InfoMessage::SegmentInserted { segment, info } => self.add(*segment, info),
            InfoMessage::InsertedSegmentIdUpdated {
                new_segment,
                old_segment,
                info,
            } => self.update(*new_segment, *old_segment, info),
            InfoMessage::InsertedEndPointsUpdated {
                segment,
                new_info,
                old_info,
            } => {
                self.remove(*segment, old_info);
                self.add(*segment, new_info);
            }
            InfoMessage::SegmentUninserted { segment, info } => self.remove(*segment, info),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::OrderedLine;
    use crate::core::ids::{SegmentIndex, WireId};
    use crate::core::logicitem::{LogicItemDefinition, LogicItemType};

    #[test]
    fn logicitem_outputs_follow_messages() {
        let mut index = LogicItemConnectionIndex::new(ConnectionKind::Output);
        let data = LogicItemData::new(
            LogicItemDefinition::new(LogicItemType::BufferElement, 1, Orientation::Right),
            Point::new(0, 0),
        );

        index.submit(&InfoMessage::LogicItemInserted {
            logicitem_id: LogicItemId(4),
            data: data.clone(),
        });
        let entry = index.find(Point::new(1, 0)).expect("Ausgang erwartet");
        assert_eq!(entry.logicitem_id, LogicItemId(4));
        assert_eq!(entry.orientation, Orientation::Right);

        index.submit(&InfoMessage::InsertedLogicItemIdUpdated {
            new_logicitem_id: LogicItemId(1),
            old_logicitem_id: LogicItemId(4),
            data: data.clone(),
        });
        assert_eq!(
            index.find(Point::new(1, 0)).map(|e| e.logicitem_id),
            Some(LogicItemId(1))
        );

        index.submit(&InfoMessage::LogicItemUninserted {
            logicitem_id: LogicItemId(1),
            data,
        });
        assert!(index.is_empty());
    }

    #[test]
    fn wire_outputs_track_endpoint_updates() {
        let mut index = WireConnectionIndex::new(ConnectionKind::Output);
        let segment = Segment::new(WireId(2), SegmentIndex(0));
        let line = OrderedLine::from_points(Point::new(0, 0), Point::new(5, 0));
        let old_info = SegmentInfo {
            line,
            p0_type: SegmentPointType::Output,
            p1_type: SegmentPointType::Output,
        };
        let new_info = SegmentInfo {
            p0_type: SegmentPointType::Input,
            ..old_info
        };

        index.submit(&InfoMessage::SegmentInserted {
            segment,
            info: old_info,
        });
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.find(Point::new(0, 0)).map(|e| e.orientation),
            Some(Orientation::Left)
        );

        index.submit(&InfoMessage::InsertedEndPointsUpdated {
            segment,
            new_info,
            old_info,
        });
        assert_eq!(index.len(), 1);
        assert!(index.find(Point::new(0, 0)).is_none());
    }
}
