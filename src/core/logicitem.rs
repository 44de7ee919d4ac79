//! Logikelemente: Typkatalog, Anschlüsse und Körperpunkte.
//!
//! Die Geometrie wird lokal für Orientierung `Right` beschrieben und dann
//! gedreht bzw. gespiegelt.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::grid::{is_representable, Point};
use super::geometry::Orientation;

/// Anzeigezustand eines Elements, immer aus Geometrie und Index ableitbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DisplayState {
    Normal,
    Valid,
    Colliding,
    Temporary,
}

impl DisplayState {
    /// Elemente in `Normal` und `Valid` sind in den Indizes registriert.
    pub fn is_inserted(self) -> bool {
        matches!(self, DisplayState::Normal | DisplayState::Valid)
    }
}

/// Angeforderte Prüfstufe einer Editieroperation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InsertionMode {
    Temporary,
    Collisions,
    InsertOrDiscard,
}

/// Einfügemodus, in dem sich ein Element mit diesem Anzeigezustand befindet.
pub fn to_insertion_mode(state: DisplayState) -> InsertionMode {
    match state {
        DisplayState::Normal => InsertionMode::InsertOrDiscard,
        DisplayState::Valid | DisplayState::Colliding => InsertionMode::Collisions,
        DisplayState::Temporary => InsertionMode::Temporary,
    }
}

/// Katalog der unterstützten Elementtypen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogicItemType {
    BufferElement,
    AndElement,
    OrElement,
    XorElement,
    Latch,
    Button,
    Led,
}

impl LogicItemType {
    pub const ALL: [LogicItemType; 7] = [
        LogicItemType::BufferElement,
        LogicItemType::AndElement,
        LogicItemType::OrElement,
        LogicItemType::XorElement,
        LogicItemType::Latch,
        LogicItemType::Button,
        LogicItemType::Led,
    ];

    /// Erlaubte Anzahl Eingänge.
    pub fn input_range(self) -> (usize, usize) {
        match self {
            LogicItemType::BufferElement => (1, 1),
            LogicItemType::AndElement | LogicItemType::OrElement | LogicItemType::XorElement => {
                (2, MAX_GATE_INPUTS)
            }
            LogicItemType::Latch => (2, 2),
            LogicItemType::Button => (0, 0),
            LogicItemType::Led => (1, 1),
        }
    }

    pub fn output_count(self) -> usize {
        match self {
            LogicItemType::Latch => 2,
            LogicItemType::Led => 0,
            _ => 1,
        }
    }

    /// Ungerichtete Elemente lassen sich nicht drehen.
    pub fn is_undirected(self) -> bool {
        matches!(self, LogicItemType::Button | LogicItemType::Led)
    }
}

impl fmt::Display for LogicItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicItemType::BufferElement => "buffer",
            LogicItemType::AndElement => "and",
            LogicItemType::OrElement => "or",
            LogicItemType::XorElement => "xor",
            LogicItemType::Latch => "latch",
            LogicItemType::Button => "button",
            LogicItemType::Led => "led",
        };
        f.write_str(name)
    }
}

/// Maximale Eingänge eines Gatters.
pub const MAX_GATE_INPUTS: usize = 8;

/// Vollständige Beschreibung eines Elements ohne Position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicItemDefinition {
    pub logicitem_type: LogicItemType,
    pub input_count: usize,
    pub output_count: usize,
    pub orientation: Orientation,
    pub input_inverters: Vec<bool>,
    pub output_inverters: Vec<bool>,
}

impl LogicItemDefinition {
    /// Standarddefinition eines Typs.
    pub fn new(logicitem_type: LogicItemType, input_count: usize, orientation: Orientation) -> Self {
        let orientation = if logicitem_type.is_undirected() {
            Orientation::Undirected
        } else {
            orientation
        };
        let output_count = logicitem_type.output_count();
        Self {
            logicitem_type,
            input_count,
            output_count,
            orientation,
            input_inverters: vec![false; input_count],
            output_inverters: vec![false; output_count],
        }
    }

    pub fn is_valid(&self) -> bool {
        let (min, max) = self.logicitem_type.input_range();
        let orientation_ok = if self.logicitem_type.is_undirected() {
            self.orientation == Orientation::Undirected
        } else {
            self.orientation.is_directed()
        };
        (min..=max).contains(&self.input_count)
            && self.output_count == self.logicitem_type.output_count()
            && self.input_inverters.len() == self.input_count
            && self.output_inverters.len() == self.output_count
            && orientation_ok
    }

    /// Breite und Höhe für Orientierung `Right`.
    fn local_size(&self) -> (i32, i32) {
        match self.logicitem_type {
            LogicItemType::BufferElement => (1, 0),
            LogicItemType::AndElement | LogicItemType::OrElement | LogicItemType::XorElement => {
                (2, self.input_count as i32 - 1)
            }
            LogicItemType::Latch => (3, 1),
            LogicItemType::Button | LogicItemType::Led => (0, 0),
        }
    }

    fn local_inputs(&self) -> Vec<(i32, i32, Orientation)> {
        match self.logicitem_type {
            LogicItemType::Button => Vec::new(),
            LogicItemType::Led => vec![(0, 0, Orientation::Undirected)],
            _ => (0..self.input_count as i32)
                .map(|y| (0, y, Orientation::Left))
                .collect(),
        }
    }

    fn local_outputs(&self) -> Vec<(i32, i32, Orientation)> {
        let (width, height) = self.local_size();
        match self.logicitem_type {
            LogicItemType::Button => vec![(0, 0, Orientation::Undirected)],
            LogicItemType::Led => Vec::new(),
            LogicItemType::Latch => vec![
                (width, 0, Orientation::Right),
                (width, 1, Orientation::Right),
            ],
            _ => vec![(width, height / 2, Orientation::Right)],
        }
    }

    /// Transformiert lokale Koordinaten entsprechend der Orientierung.
    fn transform(&self, x: i32, y: i32) -> (i32, i32) {
        let (width, height) = self.local_size();
        match self.orientation {
            Orientation::Right | Orientation::Undirected => (x, y),
            Orientation::Left => (width - x, y),
            Orientation::Down => (height - y, x),
            Orientation::Up => (y, width - x),
        }
    }

    fn transform_orientation(&self, connector: Orientation) -> Orientation {
        use Orientation::*;
        match (self.orientation, connector) {
            (_, Undirected) => Undirected,
            (Right | Undirected, o) => o,
            (Left, Right) => Left,
            (Left, Left) => Right,
            (Left, o) => o,
            (Down, Right) => Down,
            (Down, Down) => Left,
            (Down, Left) => Up,
            (Down, Up) => Right,
            (Up, Right) => Up,
            (Up, Up) => Left,
            (Up, Left) => Down,
            (Up, Down) => Right,
        }
    }

    /// Globale Breite und Höhe nach Drehung.
    pub fn size(&self) -> (i32, i32) {
        let (width, height) = self.local_size();
        match self.orientation {
            Orientation::Up | Orientation::Down => (height, width),
            _ => (width, height),
        }
    }
}

/// Ein Anschluss an absoluter Position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectorLocation {
    pub connection_id: usize,
    pub position: Point,
    pub orientation: Orientation,
}

/// Definition plus Position: alles, was die Indizes zum Registrieren brauchen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicItemData {
    pub definition: LogicItemDefinition,
    pub position: Point,
}

fn to_point(position: Point, dx: i32, dy: i32) -> Point {
    position.offset_unchecked(dx, dy)
}

impl LogicItemData {
    pub fn new(definition: LogicItemDefinition, position: Point) -> Self {
        Self {
            definition,
            position,
        }
    }

    /// Sind alle Punkte des Elements an dieser Position darstellbar?
    pub fn is_representable(definition: &LogicItemDefinition, position: Point) -> bool {
        let (width, height) = definition.size();
        let x = position.x.value();
        let y = position.y.value();
        is_representable(x, y) && is_representable(x + width, y + height)
    }

    /// Wäre das Element nach Verschiebung noch darstellbar?
    pub fn is_representable_offset(&self, dx: i32, dy: i32) -> bool {
        let (width, height) = self.definition.size();
        self.position
            .checked_offset(dx, dy)
            .is_some_and(|position| position.is_representable_offset(width, height))
    }

    pub fn inputs(&self) -> Vec<ConnectorLocation> {
        self.connectors(self.definition.local_inputs())
    }

    pub fn outputs(&self) -> Vec<ConnectorLocation> {
        self.connectors(self.definition.local_outputs())
    }

    fn connectors(&self, local: Vec<(i32, i32, Orientation)>) -> Vec<ConnectorLocation> {
        local
            .into_iter()
            .enumerate()
            .map(|(connection_id, (x, y, orientation))| {
                let (dx, dy) = self.definition.transform(x, y);
                ConnectorLocation {
                    connection_id,
                    position: to_point(self.position, dx, dy),
                    orientation: self.definition.transform_orientation(orientation),
                }
            })
            .collect()
    }

    /// Alle Punkte des umschließenden Rechtecks ohne Anschlüsse.
    pub fn body_points(&self) -> Vec<Point> {
        let connectors: Vec<Point> = self
            .inputs()
            .into_iter()
            .chain(self.outputs())
            .map(|connector| connector.position)
            .collect();
        let (width, height) = self.definition.size();

        let mut result = Vec::new();
        for dx in 0..=width {
            for dy in 0..=height {
                let point = to_point(self.position, dx, dy);
                if !connectors.contains(&point) {
                    result.push(point);
                }
            }
        }
        result
    }

    /// Umschließendes Rechteck als Eckpunkte.
    pub fn bounding_points(&self) -> (Point, Point) {
        let (width, height) = self.definition.size();
        (self.position, to_point(self.position, width, height))
    }
}

/// Ein platziertes Logikelement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicItem {
    pub definition: LogicItemDefinition,
    pub position: Point,
    pub display_state: DisplayState,
}

impl LogicItem {
    pub fn data(&self) -> LogicItemData {
        LogicItemData::new(self.definition.clone(), self.position)
    }
}

/// Welche Anschlussart ein Inverter betrifft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    Input,
    Output,
}

/// Adressiert einen Anschluss eines Elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionRef {
    pub kind: ConnectionKind,
    pub connection_id: usize,
}
