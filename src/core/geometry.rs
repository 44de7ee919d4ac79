//! Linien, Offsets und Teilbereiche auf dem Gitter.
//!
//! Alle Funktionen sind rein; sie führen keine Index- oder Kollisionsarbeit aus.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::grid::{Grid, Point, RectFine};

// ── Orientierung ────────────────────────────────────────────────────

/// Richtung eines Anschlusses oder eines Leitungsendes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Right,
    Left,
    Up,
    Down,
    Undirected,
}

impl Orientation {
    /// Alle gerichteten Orientierungen.
    pub const DIRECTED: [Orientation; 4] = [
        Orientation::Right,
        Orientation::Left,
        Orientation::Up,
        Orientation::Down,
    ];

    pub fn opposite(self) -> Orientation {
        match self {
            Orientation::Right => Orientation::Left,
            Orientation::Left => Orientation::Right,
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
            Orientation::Undirected => Orientation::Undirected,
        }
    }

    pub fn is_directed(self) -> bool {
        self != Orientation::Undirected
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Orientation::Right => "right",
            Orientation::Left => "left",
            Orientation::Up => "up",
            Orientation::Down => "down",
            Orientation::Undirected => "undirected",
        };
        f.write_str(name)
    }
}

/// Zwei Anschlüsse passen zusammen, wenn sie einander gegenüberstehen
/// oder einer von beiden ungerichtet ist.
pub fn orientations_compatible(a: Orientation, b: Orientation) -> bool {
    a == Orientation::Undirected || b == Orientation::Undirected || a.opposite() == b
}

// ── Offsets und Parts ───────────────────────────────────────────────

/// Abstand entlang einer Linie, gemessen ab ihrem Punkt `p0`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Offset(pub u16);

impl Offset {
    pub fn value(self) -> i32 {
        i32::from(self.0)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Halb-offenes Intervall `[begin, end)` entlang einer Linie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Part {
    pub begin: Offset,
    pub end: Offset,
}

impl Part {
    /// Panics bei leerem oder umgekehrtem Intervall.
    pub fn new(begin: u16, end: u16) -> Self {
        assert!(begin < end, "Part [{begin}, {end}) ist leer");
        Self {
            begin: Offset(begin),
            end: Offset(end),
        }
    }

    pub fn length(self) -> i32 {
        self.end.value() - self.begin.value()
    }

    /// Verschiebt das Intervall um `delta`.
    pub fn shifted(self, delta: i32) -> Part {
        let begin = self.begin.value() + delta;
        let end = self.end.value() + delta;
        match (u16::try_from(begin), u16::try_from(end)) {
            (Ok(begin), Ok(end)) => Part::new(begin, end),
            _ => panic!("Part {self} um {delta} verschoben liegt außerhalb"),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

pub fn a_equal_b(a: Part, b: Part) -> bool {
    a == b
}

pub fn a_inside_b(a: Part, b: Part) -> bool {
    b.begin <= a.begin && a.end <= b.end
}

pub fn a_disjoint_b(a: Part, b: Part) -> bool {
    a.end <= b.begin || b.end <= a.begin
}

pub fn a_overlaps_b(a: Part, b: Part) -> bool {
    !a_disjoint_b(a, b)
}

/// Schnittmenge zweier Parts, falls nicht leer.
pub fn intersection(a: Part, b: Part) -> Option<Part> {
    let begin = a.begin.max(b.begin);
    let end = a.end.min(b.end);
    (begin < end).then_some(Part { begin, end })
}

// ── Geordnete Linien ────────────────────────────────────────────────

/// Achsenparallele Linie mit `p0 < p1` und Länge größer null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderedLine {
    pub p0: Point,
    pub p1: Point,
}

impl OrderedLine {
    /// Erstellt eine Linie aus zwei beliebig sortierten Punkten.
    ///
    /// `None` für diagonale Linien oder Linien ohne Länge.
    pub fn new(a: Point, b: Point) -> Option<Self> {
        if a == b || (a.x != b.x && a.y != b.y) {
            return None;
        }
        let (p0, p1) = if a < b { (a, b) } else { (b, a) };
        Some(Self { p0, p1 })
    }

    /// Wie [`OrderedLine::new`], verletzt der Aufrufer die Vorbedingung gibt es einen Panic.
    pub fn from_points(a: Point, b: Point) -> Self {
        match Self::new(a, b) {
            Some(line) => line,
            None => panic!("Keine gültige Linie: {a} - {b}"),
        }
    }

    pub fn is_horizontal(self) -> bool {
        self.p0.y == self.p1.y
    }

    pub fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    /// Länge in Gitterschritten.
    pub fn length(self) -> i32 {
        if self.is_horizontal() {
            self.p1.x.value() - self.p0.x.value()
        } else {
            self.p1.y.value() - self.p0.y.value()
        }
    }

    /// Das volle Intervall der Linie.
    pub fn full_part(self) -> Part {
        Part {
            begin: Offset(0),
            end: self.to_offset(self.p1),
        }
    }

    pub fn is_endpoint(self, point: Point) -> bool {
        point == self.p0 || point == self.p1
    }

    /// Punkt liegt auf der Linie, Endpunkte eingeschlossen.
    pub fn contains(self, point: Point) -> bool {
        if self.is_horizontal() {
            point.y == self.p0.y && self.p0.x <= point.x && point.x <= self.p1.x
        } else {
            point.x == self.p0.x && self.p0.y <= point.y && point.y <= self.p1.y
        }
    }

    /// Punkt liegt echt im Inneren der Linie.
    pub fn is_inside(self, point: Point) -> bool {
        self.contains(point) && !self.is_endpoint(point)
    }

    /// Offset eines Punktes auf der Linie.
    pub fn to_offset(self, point: Point) -> Offset {
        assert!(self.contains(point), "Punkt {point} liegt nicht auf {self}");
        let distance = if self.is_horizontal() {
            point.x.value() - self.p0.x.value()
        } else {
            point.y.value() - self.p0.y.value()
        };
        match u16::try_from(distance) {
            Ok(value) => Offset(value),
            Err(_) => panic!("Offset {distance} nicht darstellbar"),
        }
    }

    /// Punkt zu einem Offset auf der Linie.
    pub fn to_point(self, offset: Offset) -> Point {
        assert!(
            offset.value() <= self.length(),
            "Offset {offset} außerhalb von {self}"
        );
        if self.is_horizontal() {
            Point {
                x: Grid((self.p0.x.value() + offset.value()) as i16),
                y: self.p0.y,
            }
        } else {
            Point {
                x: self.p0.x,
                y: Grid((self.p0.y.value() + offset.value()) as i16),
            }
        }
    }

    /// Teilstück der Linie für ein Intervall.
    pub fn sub_line(self, part: Part) -> OrderedLine {
        OrderedLine {
            p0: self.to_point(part.begin),
            p1: self.to_point(part.end),
        }
    }

    /// Intervall einer Teillinie innerhalb dieser Linie.
    pub fn to_part(self, sub_line: OrderedLine) -> Part {
        Part {
            begin: self.to_offset(sub_line.p0),
            end: self.to_offset(sub_line.p1),
        }
    }

    /// Liegt die Linie nach Verschiebung noch im Gitter?
    pub fn is_representable_offset(self, dx: i32, dy: i32) -> bool {
        self.p0.is_representable_offset(dx, dy) && self.p1.is_representable_offset(dx, dy)
    }

    /// Verschiebt die Linie ohne erneute Prüfung.
    pub fn offset_unchecked(self, dx: i32, dy: i32) -> OrderedLine {
        OrderedLine {
            p0: self.p0.offset_unchecked(dx, dy),
            p1: self.p1.offset_unchecked(dx, dy),
        }
    }

    /// Richtung, in die das Leitungsende am Punkt `p0` zeigt.
    pub fn orientation_p0(self) -> Orientation {
        if self.is_horizontal() {
            Orientation::Left
        } else {
            Orientation::Up
        }
    }

    /// Richtung, in die das Leitungsende am Punkt `p1` zeigt.
    pub fn orientation_p1(self) -> Orientation {
        if self.is_horizontal() {
            Orientation::Right
        } else {
            Orientation::Down
        }
    }

    /// Richtung des Leitungsendes an einem der beiden Endpunkte.
    pub fn orientation_at(self, point: Point) -> Orientation {
        if point == self.p0 {
            self.orientation_p0()
        } else if point == self.p1 {
            self.orientation_p1()
        } else {
            panic!("{point} ist kein Endpunkt von {self}")
        }
    }

    /// Teilt die Linie an einem inneren Punkt.
    pub fn split_at(self, point: Point) -> (OrderedLine, OrderedLine) {
        assert!(self.is_inside(point), "{point} liegt nicht innerhalb {self}");
        (
            OrderedLine { p0: self.p0, p1: point },
            OrderedLine { p0: point, p1: self.p1 },
        )
    }

    /// Alle Gitterpunkte der Linie inklusive Endpunkte.
    pub fn points(self) -> impl Iterator<Item = Point> {
        let line = self;
        (0..=line.length()).map(move |step| line.to_point(Offset(step as u16)))
    }

    /// Innere Gitterpunkte (ohne Endpunkte).
    pub fn inner_points(self) -> impl Iterator<Item = Point> {
        let line = self;
        (1..line.length()).map(move |step| line.to_point(Offset(step as u16)))
    }

    pub fn bounding_rect(self) -> RectFine {
        RectFine::from_points(self.p0, self.p1)
    }
}

impl fmt::Display for OrderedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.p0, self.p1)
    }
}

/// Zwei Linien sind verbindbar, wenn sie parallel sind und sich an einem Ende berühren.
pub fn lines_touching_collinear(a: OrderedLine, b: OrderedLine) -> bool {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    first.is_horizontal() == second.is_horizontal() && first.p1 == second.p0
}

/// Verbindet zwei parallele, sich berührende Linien.
pub fn merge_touching(a: OrderedLine, b: OrderedLine) -> OrderedLine {
    assert!(
        lines_touching_collinear(a, b),
        "Linien {a} und {b} berühren sich nicht"
    );
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    OrderedLine {
        p0: first.p0,
        p1: second.p1,
    }
}

/// Wie eine L-förmige Leitung zwischen zwei Punkten gelegt wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineInsertionType {
    HorizontalFirst,
    VerticalFirst,
}

/// Zerlegt die Verbindung zweier Punkte in höchstens zwei achsenparallele Linien.
pub fn orthogonal_lines(p0: Point, p1: Point, kind: LineInsertionType) -> Vec<OrderedLine> {
    let corner = match kind {
        LineInsertionType::HorizontalFirst => Point { x: p1.x, y: p0.y },
        LineInsertionType::VerticalFirst => Point { x: p0.x, y: p1.y },
    };
    [OrderedLine::new(p0, corner), OrderedLine::new(corner, p1)]
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: i16, y0: i16, x1: i16, y1: i16) -> OrderedLine {
        OrderedLine::new(Point::new(x0, y0), Point::new(x1, y1)).expect("gültige Linie erwartet")
    }

    #[test]
    fn ordered_line_rejects_diagonal_and_empty() {
        assert!(OrderedLine::new(Point::new(0, 0), Point::new(1, 1)).is_none());
        assert!(OrderedLine::new(Point::new(3, 3), Point::new(3, 3)).is_none());
    }

    #[test]
    fn ordered_line_sorts_points() {
        let l = line(10, 0, 0, 0);
        assert_eq!(l.p0, Point::new(0, 0));
        assert_eq!(l.p1, Point::new(10, 0));
        assert_eq!(l.length(), 10);
    }

    #[test]
    fn offset_point_conversion() {
        let l = line(2, 5, 2, 9);
        assert_eq!(l.to_offset(Point::new(2, 7)), Offset(2));
        assert_eq!(l.to_point(Offset(4)), Point::new(2, 9));
        assert_eq!(l.sub_line(Part::new(1, 3)), line(2, 6, 2, 8));
        assert_eq!(l.to_part(line(2, 6, 2, 8)), Part::new(1, 3));
    }

    #[test]
    fn endpoint_orientations_point_away_from_line() {
        let horizontal = line(0, 0, 5, 0);
        let vertical = line(0, 0, 0, 5);

        assert_eq!(horizontal.orientation_p0(), Orientation::Left);
        assert_eq!(horizontal.orientation_p1(), Orientation::Right);
        assert_eq!(vertical.orientation_p0(), Orientation::Up);
        assert_eq!(vertical.orientation_p1(), Orientation::Down);
    }

    #[test]
    fn compatible_orientations() {
        assert!(orientations_compatible(Orientation::Right, Orientation::Left));
        assert!(orientations_compatible(Orientation::Undirected, Orientation::Up));
        assert!(!orientations_compatible(Orientation::Right, Orientation::Right));
        assert!(!orientations_compatible(Orientation::Up, Orientation::Left));
    }

    #[test]
    fn part_relations() {
        let full = Part::new(0, 10);
        let middle = Part::new(3, 6);

        assert!(a_inside_b(middle, full));
        assert!(a_disjoint_b(Part::new(0, 3), Part::new(3, 6)));
        assert!(a_overlaps_b(Part::new(0, 4), middle));
        assert_eq!(intersection(Part::new(0, 4), middle), Some(Part::new(3, 4)));
        assert_eq!(intersection(Part::new(0, 3), middle), None);
    }

    #[test]
    fn representability_of_moved_lines() {
        let l = line(0, 0, 10, 0);
        assert!(l.is_representable_offset(10, 10));
        assert!(!l.is_representable_offset(i32::from(i16::MAX) - 5, 0));
        assert!(!l.is_representable_offset(i32::MAX, 0));
        assert!(!l.is_representable_offset(i32::MIN, i32::MIN));
    }

    #[test]
    fn merge_touching_lines() {
        let merged = merge_touching(line(5, 0, 10, 0), line(0, 0, 5, 0));
        assert_eq!(merged, line(0, 0, 10, 0));
        assert!(!lines_touching_collinear(line(0, 0, 5, 0), line(5, 0, 5, 5)));
    }

    #[test]
    fn orthogonal_lines_build_corner() {
        let lines = orthogonal_lines(
            Point::new(0, 0),
            Point::new(5, 5),
            LineInsertionType::HorizontalFirst,
        );
        assert_eq!(lines, vec![line(0, 0, 5, 0), line(5, 0, 5, 5)]);

        let straight = orthogonal_lines(
            Point::new(0, 0),
            Point::new(0, 5),
            LineInsertionType::HorizontalFirst,
        );
        assert_eq!(straight, vec![line(0, 0, 0, 5)]);
    }

    #[test]
    fn inner_points_exclude_endpoints() {
        let points: Vec<Point> = line(0, 0, 3, 0).inner_points().collect();
        assert_eq!(points, vec![Point::new(1, 0), Point::new(2, 0)]);
    }
}
