//! Zufallsgeneratoren für Gitterpunkte, Linien und Element-Definitionen.
//!
//! Alle Funktionen nehmen einen beliebigen `Rng`, damit Tests mit
//! `StdRng::seed_from_u64` reproduzierbar bleiben.

use rand::Rng;

use super::geometry::{OrderedLine, Orientation};
use super::grid::{Grid, Point};
use super::logicitem::{InsertionMode, LogicItemDefinition, LogicItemType};

/// Zufälliger Gitterwert im geschlossenen Intervall.
pub fn random_grid(rng: &mut impl Rng, min: Grid, max: Grid) -> Grid {
    Grid(rng.gen_range(min.0..=max.0))
}

pub fn random_point(rng: &mut impl Rng, min: Grid, max: Grid) -> Point {
    Point {
        x: random_grid(rng, min, max),
        y: random_grid(rng, min, max),
    }
}

/// Horizontale oder vertikale Linie mit Länge `1..=max_length`, vollständig im Bereich.
pub fn random_line(rng: &mut impl Rng, min: Grid, max: Grid, max_length: u16) -> OrderedLine {
    assert!(min < max, "leerer Bereich {min}..{max}");
    let range = max.value() - min.value();
    let max_length = i32::from(max_length.max(1)).min(range);

    let length = rng.gen_range(1..=max_length);
    let start = random_point(rng, min, Grid((max.value() - length) as i16));
    let end = if rng.gen_bool(0.5) {
        start.offset_unchecked(length, 0)
    } else {
        start.offset_unchecked(0, length)
    };
    OrderedLine::from_points(start, end)
}

pub fn random_orientation(rng: &mut impl Rng) -> Orientation {
    Orientation::DIRECTED[rng.gen_range(0..Orientation::DIRECTED.len())]
}

/// Definition mit zufälligem Typ, Eingangszahl und Orientierung.
pub fn random_logicitem_definition(rng: &mut impl Rng) -> LogicItemDefinition {
    let logicitem_type = LogicItemType::ALL[rng.gen_range(0..LogicItemType::ALL.len())];
    let (min_inputs, max_inputs) = logicitem_type.input_range();
    let input_count = rng.gen_range(min_inputs..=max_inputs.min(4));
    let mut definition =
        LogicItemDefinition::new(logicitem_type, input_count, random_orientation(rng));

    for inverter in definition.input_inverters.iter_mut() {
        *inverter = rng.gen_bool(0.2);
    }
    definition
}

pub fn random_insertion_mode(rng: &mut impl Rng) -> InsertionMode {
    match rng.gen_range(0..3) {
        0 => InsertionMode::Temporary,
        1 => InsertionMode::Collisions,
        _ => InsertionMode::InsertOrDiscard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn lines_stay_inside_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let line = random_line(&mut rng, Grid(-5), Grid(5), 6);
            assert!(line.p0.x >= Grid(-5) && line.p1.x <= Grid(5));
            assert!(line.p0.y >= Grid(-5) && line.p1.y <= Grid(5));
            assert!((1..=6).contains(&line.length()));
        }
    }

    #[test]
    fn definitions_are_valid() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            assert!(random_logicitem_definition(&mut rng).is_valid());
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        let points_a: Vec<Point> = (0..10)
            .map(|_| random_point(&mut a, Grid(0), Grid(20)))
            .collect();
        let points_b: Vec<Point> = (0..10)
            .map(|_| random_point(&mut b, Grid(0), Grid(20)))
            .collect();
        assert_eq!(points_a, points_b);
    }
}
