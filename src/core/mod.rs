//! Core-Domänentypen: Gitter, Geometrie, Layout, Nachrichten und Indizes.

pub mod decoration;
pub mod geometry;
pub mod grid;
pub mod ids;
pub mod index;
pub mod layout;
pub mod logicitem;
pub mod message;
pub mod part_selection;
/// Zufallsgeneratoren für Tests, Benchmarks und Demo-Schaltungen
pub mod random;
pub mod segment_tree;
pub mod selection;

pub use decoration::{Decoration, DecorationData, DecorationDefinition};
pub use geometry::{LineInsertionType, Offset, OrderedLine, Orientation, Part};
pub use grid::{Grid, Point, RectFine};
pub use ids::{
    DecorationId, DecorationKey, LogicItemId, LogicItemKey, Segment, SegmentIndex, SegmentKey,
    SegmentPart, WireId,
};
pub use index::{KeyIndex, LayoutIndex};
pub use layout::Layout;
pub use logicitem::{
    ConnectionKind, ConnectionRef, DisplayState, InsertionMode, LogicItem, LogicItemData,
    LogicItemDefinition, LogicItemType,
};
pub use message::InfoMessage;
pub use part_selection::PartSelection;
pub use segment_tree::{Endpoints, SegmentInfo, SegmentPointType, SegmentTree};
pub use selection::Selection;
