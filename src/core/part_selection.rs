//! Sortierte, disjunkte Menge von Teilbereichen einer Linie.

use serde::{Deserialize, Serialize};

use super::geometry::{a_disjoint_b, intersection, Offset, Part};

/// Beschreibt, welcher Quellbereich auf welchen Zielbereich kopiert wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartCopyDefinition {
    pub destination: Part,
    pub source: Part,
}

impl PartCopyDefinition {
    /// Panics, wenn beide Bereiche nicht gleich lang sind.
    pub fn new(destination: Part, source: Part) -> Self {
        assert_eq!(
            destination.length(),
            source.length(),
            "Quell- und Zielbereich müssen gleich lang sein"
        );
        Self {
            destination,
            source,
        }
    }

    fn shift(&self) -> i32 {
        self.destination.begin.value() - self.source.begin.value()
    }
}

/// Teilbereiche sind stets sortiert, überlappungsfrei und nicht aneinanderstoßend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PartSelection {
    parts: Vec<Part>,
}

impl PartSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_part(part: Part) -> Self {
        Self { parts: vec![part] }
    }

    pub fn from_parts(parts: impl IntoIterator<Item = Part>) -> Self {
        let mut result = Self::new();
        for part in parts {
            result.add_part(part);
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Part> + '_ {
        self.parts.iter().copied()
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn first(&self) -> Option<Part> {
        self.parts.first().copied()
    }

    /// Größtes Ende aller Bereiche.
    pub fn max_offset(&self) -> Offset {
        self.parts.last().map(|part| part.end).unwrap_or_default()
    }

    /// Fügt einen Bereich hinzu und vereinigt berührende Bereiche.
    pub fn add_part(&mut self, part: Part) {
        let mut merged = part;
        let mut result = Vec::with_capacity(self.parts.len() + 1);

        for existing in self.parts.drain(..) {
            if existing.end < merged.begin || merged.end < existing.begin {
                result.push(existing);
            } else {
                merged = Part {
                    begin: existing.begin.min(merged.begin),
                    end: existing.end.max(merged.end),
                };
            }
        }
        result.push(merged);
        result.sort();
        self.parts = result;
    }

    /// Entfernt einen Bereich; angeschnittene Bereiche werden gekürzt.
    pub fn remove_part(&mut self, removing: Part) {
        let mut result = Vec::with_capacity(self.parts.len() + 1);

        for part in self.parts.drain(..) {
            if a_disjoint_b(part, removing) {
                result.push(part);
                continue;
            }
            if part.begin < removing.begin {
                result.push(Part {
                    begin: part.begin,
                    end: removing.begin,
                });
            }
            if removing.end < part.end {
                result.push(Part {
                    begin: removing.end,
                    end: part.end,
                });
            }
        }
        self.parts = result;
    }

    /// Ist der Bereich vollständig enthalten?
    pub fn contains(&self, part: Part) -> bool {
        self.parts
            .iter()
            .any(|p| p.begin <= part.begin && part.end <= p.end)
    }

    pub fn overlaps(&self, part: Part) -> bool {
        self.parts.iter().any(|p| !a_disjoint_b(*p, part))
    }

    /// Komplement innerhalb eines Bereichs.
    pub fn inverted(&self, full: Part) -> PartSelection {
        let mut result = PartSelection::new();
        let mut cursor = full.begin;

        for part in &self.parts {
            if let Some(inside) = intersection(*part, full) {
                if cursor < inside.begin {
                    result.parts.push(Part {
                        begin: cursor,
                        end: inside.begin,
                    });
                }
                cursor = cursor.max(inside.end);
            }
        }
        if cursor < full.end {
            result.parts.push(Part {
                begin: cursor,
                end: full.end,
            });
        }
        result
    }

    /// Kopiert die Bereiche aus `source` im Quellbereich verschoben in den Zielbereich.
    pub fn copy_parts(&mut self, source: &PartSelection, definition: PartCopyDefinition) {
        let shift = definition.shift();
        for part in &source.parts {
            if let Some(inside) = intersection(*part, definition.source) {
                self.add_part(inside.shifted(shift));
            }
        }
    }

    /// Verschiebt den Quellbereich innerhalb derselben Auswahl.
    pub fn move_parts_within(&mut self, definition: PartCopyDefinition) {
        let original = self.clone();
        self.remove_part(definition.source);
        self.copy_parts(&original, definition);
    }

    /// Verschiebt den Quellbereich aus `self` nach `destination`.
    pub fn move_parts_to(&mut self, destination: &mut PartSelection, definition: PartCopyDefinition) {
        destination.copy_parts(self, definition);
        self.remove_part(definition.source);
    }

    /// Verschiebt alle Bereiche um `delta`; Bereiche unter Null entfallen.
    pub fn shifted(&self, delta: i32) -> PartSelection {
        let mut result = PartSelection::new();
        for part in &self.parts {
            let begin = (part.begin.value() + delta).max(0);
            let end = part.end.value() + delta;
            if begin < end {
                result
                    .parts
                    .push(Part::new(begin as u16, end as u16));
            }
        }
        result
    }
}

/// Zerlegt `full` entlang der Auswahl und ruft `func(part, ausgewählt)` je Abschnitt auf.
pub fn iter_parts_partial(full: Part, selection: &PartSelection, mut func: impl FnMut(Part, bool)) {
    let mut cursor = full.begin;

    for part in selection.iter() {
        let Some(inside) = intersection(part, full) else {
            continue;
        };
        if cursor < inside.begin {
            func(
                Part {
                    begin: cursor,
                    end: inside.begin,
                },
                false,
            );
        }
        func(inside, true);
        cursor = inside.end;
    }
    if cursor < full.end {
        func(
            Part {
                begin: cursor,
                end: full.end,
            },
            false,
        );
    }
}
