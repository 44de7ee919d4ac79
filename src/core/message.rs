//! Geschlossene Menge von Änderungsnachrichten.
//!
//! Jede mutierende Operation beschreibt ihre Wirkung vollständig über diese
//! Nachrichten; Indizes und Selektionen sind reine Reduzierer darüber.

use std::fmt;

use super::decoration::DecorationData;
use super::geometry::Offset;
use super::ids::{DecorationId, LogicItemId, Segment, SegmentPart};
use super::logicitem::LogicItemData;
use super::segment_tree::SegmentInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoMessage {
    // Logikelemente
    LogicItemCreated {
        logicitem_id: LogicItemId,
    },
    LogicItemIdUpdated {
        new_logicitem_id: LogicItemId,
        old_logicitem_id: LogicItemId,
    },
    LogicItemDeleted {
        logicitem_id: LogicItemId,
    },
    LogicItemInserted {
        logicitem_id: LogicItemId,
        data: LogicItemData,
    },
    InsertedLogicItemIdUpdated {
        new_logicitem_id: LogicItemId,
        old_logicitem_id: LogicItemId,
        data: LogicItemData,
    },
    LogicItemUninserted {
        logicitem_id: LogicItemId,
        data: LogicItemData,
    },

    // Dekorationen
    DecorationCreated {
        decoration_id: DecorationId,
    },
    DecorationIdUpdated {
        new_decoration_id: DecorationId,
        old_decoration_id: DecorationId,
    },
    DecorationDeleted {
        decoration_id: DecorationId,
    },
    DecorationInserted {
        decoration_id: DecorationId,
        data: DecorationData,
    },
    InsertedDecorationIdUpdated {
        new_decoration_id: DecorationId,
        old_decoration_id: DecorationId,
        data: DecorationData,
    },
    DecorationUninserted {
        decoration_id: DecorationId,
        data: DecorationData,
    },

    // Segmente
    SegmentCreated {
        segment: Segment,
        size: Offset,
    },
    SegmentIdUpdated {
        new_segment: Segment,
        old_segment: Segment,
    },
    SegmentPartMoved {
        destination: SegmentPart,
        source: SegmentPart,
        create_destination: bool,
        delete_source: bool,
    },
    SegmentPartDeleted {
        segment_part: SegmentPart,
        delete_segment: bool,
    },
    SegmentInserted {
        segment: Segment,
        info: SegmentInfo,
    },
    InsertedSegmentIdUpdated {
        new_segment: Segment,
        old_segment: Segment,
        info: SegmentInfo,
    },
    InsertedEndPointsUpdated {
        segment: Segment,
        new_info: SegmentInfo,
        old_info: SegmentInfo,
    },
    SegmentUninserted {
        segment: Segment,
        info: SegmentInfo,
    },
}

impl InfoMessage {
    /// Kurzname für Logausgaben.
    pub fn name(&self) -> &'static str {
        match self {
            InfoMessage::LogicItemCreated { .. } => "LogicItemCreated",
            InfoMessage::LogicItemIdUpdated { .. } => "LogicItemIdUpdated",
            InfoMessage::LogicItemDeleted { .. } => "LogicItemDeleted",
            InfoMessage::LogicItemInserted { .. } => "LogicItemInserted",
            InfoMessage::InsertedLogicItemIdUpdated { .. } => "InsertedLogicItemIdUpdated",
            InfoMessage::LogicItemUninserted { .. } => "LogicItemUninserted",
            InfoMessage::DecorationCreated { .. } => "DecorationCreated",
            InfoMessage::DecorationIdUpdated { .. } => "DecorationIdUpdated",
            InfoMessage::DecorationDeleted { .. } => "DecorationDeleted",
            InfoMessage::DecorationInserted { .. } => "DecorationInserted",
            InfoMessage::InsertedDecorationIdUpdated { .. } => "InsertedDecorationIdUpdated",
            InfoMessage::DecorationUninserted { .. } => "DecorationUninserted",
            InfoMessage::SegmentCreated { .. } => "SegmentCreated",
            InfoMessage::SegmentIdUpdated { .. } => "SegmentIdUpdated",
            InfoMessage::SegmentPartMoved { .. } => "SegmentPartMoved",
            InfoMessage::SegmentPartDeleted { .. } => "SegmentPartDeleted",
            InfoMessage::SegmentInserted { .. } => "SegmentInserted",
            InfoMessage::InsertedSegmentIdUpdated { .. } => "InsertedSegmentIdUpdated",
            InfoMessage::InsertedEndPointsUpdated { .. } => "InsertedEndPointsUpdated",
            InfoMessage::SegmentUninserted { .. } => "SegmentUninserted",
        }
    }
}

impl fmt::Display for InfoMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoMessage::LogicItemCreated { logicitem_id }
            | InfoMessage::LogicItemDeleted { logicitem_id } => {
                write!(f, "{}({logicitem_id})", self.name())
            }
            InfoMessage::LogicItemIdUpdated {
                new_logicitem_id,
                old_logicitem_id,
            } => write!(f, "{}({old_logicitem_id} -> {new_logicitem_id})", self.name()),
            InfoMessage::SegmentPartMoved {
                destination,
                source,
                create_destination,
                delete_source,
            } => write!(
                f,
                "{}({source} -> {destination}, create={create_destination}, delete={delete_source})",
                self.name()
            ),
            InfoMessage::SegmentIdUpdated {
                new_segment,
                old_segment,
            } => write!(f, "{}({old_segment} -> {new_segment})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}
