//! Gitter-Koordinaten mit geprüfter Arithmetik.
//!
//! Ein Überlauf ist ein regulärer Ausgang jeder Rechnung: alle Verschiebungen
//! werden vorab mit [`is_representable`] geprüft, nie nachträglich erkannt.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Eine diskrete Position auf dem Gitter in einer Dimension.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Grid(pub i16);

impl Grid {
    /// Kleinster darstellbarer Gitterwert.
    pub const MIN: Grid = Grid(i16::MIN);
    /// Größter darstellbarer Gitterwert.
    pub const MAX: Grid = Grid(i16::MAX);

    /// Addiert ein Delta, `None` bei Überlauf.
    pub fn checked_add(self, delta: i32) -> Option<Grid> {
        let value = i32::from(self.0).checked_add(delta)?;
        i16::try_from(value).ok().map(Grid)
    }

    /// Nächster Gitterwert, `None` am oberen Rand.
    pub fn next(self) -> Option<Grid> {
        self.0.checked_add(1).map(Grid)
    }

    pub fn value(self) -> i32 {
        i32::from(self.0)
    }

    pub fn to_f32(self) -> f32 {
        f32::from(self.0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Prüft, ob ein Wert als Gitterkoordinate darstellbar ist.
pub fn is_representable_value(value: i32) -> bool {
    (i32::from(i16::MIN)..=i32::from(i16::MAX)).contains(&value)
}

/// Prüft, ob ein Koordinatenpaar als Gitterpunkt darstellbar ist.
pub fn is_representable(x: i32, y: i32) -> bool {
    is_representable_value(x) && is_representable_value(y)
}

/// Punkt auf dem Gitter.
///
/// Die Ordnung ist lexikographisch (erst `x`, dann `y`) und legt die Richtung
/// geordneter Linien fest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Point {
    pub x: Grid,
    pub y: Grid,
}

impl Point {
    pub const fn new(x: i16, y: i16) -> Self {
        Self {
            x: Grid(x),
            y: Grid(y),
        }
    }

    /// Verschiebt den Punkt, `None` wenn das Ergebnis nicht darstellbar ist.
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Point> {
        Some(Point {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Verschiebt ohne erneute Prüfung.
    ///
    /// Panics, wenn der Aufrufer die Darstellbarkeit nicht vorab geprüft hat.
    pub fn offset_unchecked(self, dx: i32, dy: i32) -> Point {
        match self.checked_offset(dx, dy) {
            Some(point) => point,
            None => panic!("Punkt {self} um ({dx}, {dy}) nicht darstellbar"),
        }
    }

    pub fn is_representable_offset(self, dx: i32, dy: i32) -> bool {
        self.checked_offset(dx, dy).is_some()
    }

    pub fn to_fine(self) -> Vec2 {
        Vec2::new(self.x.to_f32(), self.y.to_f32())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Achsenparalleles Rechteck in feinen (Float-)Koordinaten.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectFine {
    pub p0: Vec2,
    pub p1: Vec2,
}

impl RectFine {
    /// Erstellt ein Rechteck aus zwei beliebigen Eckpunkten.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            p0: a.min(b),
            p1: a.max(b),
        }
    }

    /// Kleinstes Rechteck, das beide Gitterpunkte enthält.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::new(a.to_fine(), b.to_fine())
    }

    pub fn center(&self) -> Vec2 {
        (self.p0 + self.p1) * 0.5
    }

    pub fn half_extent(&self) -> Vec2 {
        (self.p1 - self.p0) * 0.5
    }

    /// Vergrößert das Rechteck in alle Richtungen.
    pub fn padded(&self, padding: f32) -> Self {
        Self {
            p0: self.p0 - Vec2::splat(padding),
            p1: self.p1 + Vec2::splat(padding),
        }
    }

    /// Schnitt inklusive Rand.
    pub fn intersects(&self, other: &RectFine) -> bool {
        self.p0.x <= other.p1.x
            && other.p0.x <= self.p1.x
            && self.p0.y <= other.p1.y
            && other.p0.y <= self.p1.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.p0.x && point.x <= self.p1.x && point.y >= self.p0.y && point.y <= self.p1.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn checked_add_detects_overflow() {
        assert_eq!(Grid(10).checked_add(5), Some(Grid(15)));
        assert_eq!(Grid::MAX.checked_add(1), None);
        assert_eq!(Grid::MIN.checked_add(-1), None);
        assert_eq!(Grid(0).checked_add(i32::MAX), None);
    }

    #[test]
    fn point_offset_respects_grid_bounds() {
        let point = Point::new(100, -100);

        assert_eq!(point.checked_offset(1, 2), Some(Point::new(101, -98)));
        assert!(point.checked_offset(i32::from(i16::MAX), 0).is_none());
        assert!(point.is_representable_offset(-32_668, 0));
        assert!(!point.is_representable_offset(0, -32_669));
        assert!(!point.is_representable_offset(i32::MAX, 0));
        assert!(!point.is_representable_offset(0, i32::MIN));
    }

    #[test]
    fn point_order_is_lexicographic() {
        assert!(Point::new(0, 5) < Point::new(1, 0));
        assert!(Point::new(1, 0) < Point::new(1, 1));
    }

    #[test]
    fn rect_intersection_is_inclusive() {
        let a = RectFine::from_points(Point::new(0, 0), Point::new(10, 0));
        let b = RectFine::new(Vec2::new(10.0, -1.0), Vec2::new(12.0, 1.0));
        let c = RectFine::new(Vec2::new(10.5, -1.0), Vec2::new(12.0, 1.0));

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_relative_eq!(a.center().x, 5.0);
        assert_relative_eq!(a.half_extent().y, 0.0);
    }
}
