//! Verfolgte Selektionen, adressiert über eine `SelectionId`.

use std::collections::HashMap;
use std::fmt;

use crate::core::{InfoMessage, Layout, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionId(pub u64);

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "selection_{}", self.0)
    }
}

/// Alle Selektionen, die über Änderungen hinweg gültig bleiben.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selections: HashMap<SelectionId, Selection>,
    next_id: u64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn create(&mut self, selection: Selection) -> SelectionId {
        let selection_id = SelectionId(self.next_id);
        self.next_id += 1;
        self.selections.insert(selection_id, selection);
        selection_id
    }

    pub fn contains(&self, selection_id: SelectionId) -> bool {
        self.selections.contains_key(&selection_id)
    }

    pub fn get(&self, selection_id: SelectionId) -> &Selection {
        match self.selections.get(&selection_id) {
            Some(selection) => selection,
            None => panic!("unbekannte Selektion {selection_id}"),
        }
    }

    pub fn get_mut(&mut self, selection_id: SelectionId) -> &mut Selection {
        match self.selections.get_mut(&selection_id) {
            Some(selection) => selection,
            None => panic!("unbekannte Selektion {selection_id}"),
        }
    }

    /// Entfernt die Selektion und gibt ihren Inhalt zurück.
    pub fn take(&mut self, selection_id: SelectionId) -> Selection {
        match self.selections.remove(&selection_id) {
            Some(selection) => selection,
            None => panic!("unbekannte Selektion {selection_id}"),
        }
    }

    pub fn destroy(&mut self, selection_id: SelectionId) {
        self.take(selection_id);
    }

    pub fn submit(&mut self, message: &InfoMessage) {
        for selection in self.selections.values_mut() {
            selection.submit(message);
        }
    }

    /// Verweisen alle Selektionen nur auf existierende Elemente?
    pub fn all_valid(&self, layout: &Layout) -> bool {
        self.selections
            .values()
            .all(|selection| selection.is_valid(layout))
    }
}
