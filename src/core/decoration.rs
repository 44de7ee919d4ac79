//! Text-Dekorationen: rechteckige Flächen ohne elektrische Anschlüsse.

use serde::{Deserialize, Serialize};

use super::grid::{is_representable, Point};
use super::logicitem::DisplayState;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecorationDefinition {
    pub text: String,
    pub width: u16,
    pub height: u16,
}

impl DecorationDefinition {
    pub fn text_element(text: impl Into<String>, width: u16, height: u16) -> Self {
        Self {
            text: text.into(),
            width,
            height,
        }
    }
}

/// Definition plus Position, Grundlage der Index-Registrierung.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecorationData {
    pub definition: DecorationDefinition,
    pub position: Point,
}

impl DecorationData {
    pub fn new(definition: DecorationDefinition, position: Point) -> Self {
        Self {
            definition,
            position,
        }
    }

    pub fn is_representable(definition: &DecorationDefinition, position: Point) -> bool {
        let x = position.x.value();
        let y = position.y.value();
        is_representable(x, y)
            && is_representable(x + i32::from(definition.width), y + i32::from(definition.height))
    }

    pub fn is_representable_offset(&self, dx: i32, dy: i32) -> bool {
        self.position.checked_offset(dx, dy).is_some_and(|position| {
            position.is_representable_offset(
                i32::from(self.definition.width),
                i32::from(self.definition.height),
            )
        })
    }

    /// Jeder Gitterpunkt des Rechtecks gehört zum Körper.
    pub fn body_points(&self) -> Vec<Point> {
        let mut result = Vec::new();
        for dx in 0..=i32::from(self.definition.width) {
            for dy in 0..=i32::from(self.definition.height) {
                result.push(self.position.offset_unchecked(dx, dy));
            }
        }
        result
    }

    pub fn bounding_points(&self) -> (Point, Point) {
        (
            self.position,
            self.position.offset_unchecked(
                i32::from(self.definition.width),
                i32::from(self.definition.height),
            ),
        )
    }
}

/// Eine platzierte Dekoration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decoration {
    pub definition: DecorationDefinition,
    pub position: Point,
    pub display_state: DisplayState,
}

impl Decoration {
    pub fn data(&self) -> DecorationData {
        DecorationData::new(self.definition.clone(), self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_covers_full_rect() {
        let data = DecorationData::new(
            DecorationDefinition::text_element("Titel", 2, 1),
            Point::new(5, 5),
        );
        let body = data.body_points();

        assert_eq!(body.len(), 6);
        assert!(body.contains(&Point::new(7, 6)));
        assert_eq!(data.bounding_points(), (Point::new(5, 5), Point::new(7, 6)));
    }

    #[test]
    fn representability_includes_size() {
        let definition = DecorationDefinition::text_element("x", 10, 0);
        assert!(!DecorationData::is_representable(
            &definition,
            Point::new(i16::MAX - 5, 0)
        ));

        let data = DecorationData::new(definition, Point::new(0, 0));
        assert!(data.is_representable_offset(-100, 0));
        assert!(!data.is_representable_offset(i32::from(i16::MAX), 0));
        assert!(!data.is_representable_offset(i32::MIN, 0));
        assert!(!data.is_representable_offset(0, i32::MAX));
    }
}
