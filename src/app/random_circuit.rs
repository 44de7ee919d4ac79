//! Zufällige Schaltungen über die öffentliche Modifier-API.

use rand::Rng;

use crate::core::random::{random_line, random_logicitem_definition, random_point};
use crate::core::{DecorationDefinition, Grid, InsertionMode};
use crate::shared::options::RandomCircuitOptions;

use super::modifier::Modifier;

/// Anzahl tatsächlich eingefügter Elemente; kollidierende werden verworfen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RandomCircuitStats {
    pub logicitems: usize,
    pub decorations: usize,
    pub wire_segments: usize,
}

/// Fügt zufällige Logikelemente, Dekorationen und Leitungen als eine
/// Undo-Gruppe ein.
pub fn add_random_circuit(
    modifier: &mut Modifier,
    rng: &mut impl Rng,
    options: &RandomCircuitOptions,
) -> RandomCircuitStats {
    let min = Grid(options.grid_min);
    let max = Grid(options.grid_max);
    let mut stats = RandomCircuitStats::default();

    modifier.begin_undo_group();

    for _ in 0..options.logicitem_count {
        let definition = random_logicitem_definition(rng);
        let position = random_point(rng, min, max);
        if modifier
            .add_logicitem(definition, position, InsertionMode::InsertOrDiscard)
            .is_some()
        {
            stats.logicitems += 1;
        }
    }

    for index in 0..options.decoration_count {
        let definition = DecorationDefinition::text_element(
            format!("Text {index}"),
            rng.gen_range(1..=4),
            1,
        );
        let position = random_point(rng, min, max);
        if modifier
            .add_decoration(definition, position, InsertionMode::InsertOrDiscard)
            .is_some()
        {
            stats.decorations += 1;
        }
    }

    for _ in 0..options.wire_count {
        let line = random_line(rng, min, max, options.max_wire_length);
        if modifier
            .add_wire_segment(line, InsertionMode::InsertOrDiscard)
            .is_some()
        {
            stats.wire_segments += 1;
        }
    }

    modifier.finish_undo_group();
    log::debug!("Zufallsschaltung eingefügt: {stats:?}");
    stats
}
