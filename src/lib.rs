//! Editierbare Schaltung für LogikSim.
//! Transaktionale Layout-Mutationen mit Indizes, Selektionen und Undo/Redo,
//! als Library exportiert für Werkzeuge, Tests und Benchmarks.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    add_random_circuit, CircuitData, LayoutKeyState, Modifier, ModifierConfig, MouseTool,
    SelectionFunction, SelectionId,
};
pub use core::{
    DecorationDefinition, DecorationId, DisplayState, Endpoints, InfoMessage, InsertionMode,
    Layout, LayoutIndex, LineInsertionType, LogicItemDefinition, LogicItemId, LogicItemType,
    OrderedLine, Part, Point, RectFine, Segment, SegmentPart, SegmentPointType, Selection, WireId,
};
pub use shared::{EngineOptions, RandomCircuitOptions};
