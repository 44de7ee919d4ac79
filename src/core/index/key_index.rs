//! Stabile Schlüssel für Elemente, deren Ids sich beim Löschen ändern.
//!
//! Neue Elemente erhalten frische Schlüssel, Id-Änderungen verschieben sie,
//! Löschungen entfernen sie. Schlüssel werden nie wiederverwendet, können aber
//! über `set_*_key` gezielt wiederhergestellt werden.

use std::collections::HashMap;
use std::hash::Hash;

use crate::core::geometry::Offset;
use crate::core::ids::{
    DecorationId, DecorationKey, LogicItemId, LogicItemKey, Segment, SegmentKey,
};
use crate::core::layout::Layout;
use crate::core::message::InfoMessage;

/// Bidirektionale Zuordnung Id ↔ Schlüssel.
#[derive(Debug, Clone, PartialEq, Eq)]
struct KeyMap<I: Hash + Eq, K: Hash + Eq> {
    to_key: HashMap<I, K>,
    to_id: HashMap<K, I>,
}

impl<I, K> Default for KeyMap<I, K>
where
    I: Hash + Eq,
    K: Hash + Eq,
{
    fn default() -> Self {
        Self {
            to_key: HashMap::new(),
            to_id: HashMap::new(),
        }
    }
}

impl<I, K> KeyMap<I, K>
where
    I: Hash + Eq + Copy + std::fmt::Debug,
    K: Hash + Eq + Copy + std::fmt::Debug,
{
    fn key(&self, id: I) -> Option<K> {
        self.to_key.get(&id).copied()
    }

    fn id(&self, key: K) -> Option<I> {
        self.to_id.get(&key).copied()
    }

    fn insert(&mut self, id: I, key: K) {
        assert!(
            !self.to_key.contains_key(&id),
            "{id:?} besitzt bereits einen Schlüssel"
        );
        assert!(
            !self.to_id.contains_key(&key),
            "Schlüssel {key:?} ist bereits vergeben"
        );
        self.to_key.insert(id, key);
        self.to_id.insert(key, id);
    }

    fn remove(&mut self, id: I) -> K {
        let Some(key) = self.to_key.remove(&id) else {
            panic!("{id:?} besitzt keinen Schlüssel");
        };
        self.to_id.remove(&key);
        key
    }

    fn rename(&mut self, new_id: I, old_id: I) {
        let key = self.remove(old_id);
        self.insert(new_id, key);
    }

    fn len(&self) -> usize {
        self.to_key.len()
    }
}

/// Stabile Schlüssel aller Elemente des Layouts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyIndex {
    logicitems: KeyMap<LogicItemId, LogicItemKey>,
    decorations: KeyMap<DecorationId, DecorationKey>,
    segments: KeyMap<Segment, SegmentKey>,
    next_key: u64,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vergibt Schlüssel für alle Elemente eines bestehenden Layouts.
    pub fn from_layout(layout: &Layout) -> Self {
        let mut index = Self::new();
        for logicitem_id in layout.logicitem_ids() {
            index.submit(&InfoMessage::LogicItemCreated { logicitem_id });
        }
        for decoration_id in layout.decoration_ids() {
            index.submit(&InfoMessage::DecorationCreated { decoration_id });
        }
        for segment in layout.segments() {
            index.submit(&InfoMessage::SegmentCreated {
                segment,
                size: Offset(layout.line(segment).length() as u16),
            });
        }
        index
    }

    fn fresh(&mut self) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        key
    }

    fn reserve(&mut self, key: u64) {
        self.next_key = self.next_key.max(key + 1);
    }

    // ── Abfragen ────────────────────────────────────────────────────

    pub fn logicitem_key(&self, logicitem_id: LogicItemId) -> LogicItemKey {
        match self.logicitems.key(logicitem_id) {
            Some(key) => key,
            None => panic!("{logicitem_id} besitzt keinen Schlüssel"),
        }
    }

    pub fn logicitem_id(&self, key: LogicItemKey) -> LogicItemId {
        match self.logicitems.id(key) {
            Some(id) => id,
            None => panic!("unbekannter Schlüssel {key}"),
        }
    }

    pub fn decoration_key(&self, decoration_id: DecorationId) -> DecorationKey {
        match self.decorations.key(decoration_id) {
            Some(key) => key,
            None => panic!("{decoration_id} besitzt keinen Schlüssel"),
        }
    }

    pub fn decoration_id(&self, key: DecorationKey) -> DecorationId {
        match self.decorations.id(key) {
            Some(id) => id,
            None => panic!("unbekannter Schlüssel {key}"),
        }
    }

    pub fn segment_key(&self, segment: Segment) -> SegmentKey {
        match self.segments.key(segment) {
            Some(key) => key,
            None => panic!("{segment} besitzt keinen Schlüssel"),
        }
    }

    pub fn segment(&self, key: SegmentKey) -> Segment {
        match self.segments.id(key) {
            Some(segment) => segment,
            None => panic!("unbekannter Schlüssel {key}"),
        }
    }

    pub fn try_segment(&self, key: SegmentKey) -> Option<Segment> {
        self.segments.id(key)
    }

    // ── Wiederherstellung ───────────────────────────────────────────

    pub fn set_logicitem_key(&mut self, logicitem_id: LogicItemId, key: LogicItemKey) {
        if self.logicitems.key(logicitem_id) == Some(key) {
            return;
        }
        self.logicitems.remove(logicitem_id);
        self.logicitems.insert(logicitem_id, key);
        self.reserve(key.0);
    }

    pub fn set_decoration_key(&mut self, decoration_id: DecorationId, key: DecorationKey) {
        if self.decorations.key(decoration_id) == Some(key) {
            return;
        }
        self.decorations.remove(decoration_id);
        self.decorations.insert(decoration_id, key);
        self.reserve(key.0);
    }

    pub fn set_segment_key(&mut self, segment: Segment, key: SegmentKey) {
        if self.segments.key(segment) == Some(key) {
            return;
        }
        self.segments.remove(segment);
        self.segments.insert(segment, key);
        self.reserve(key.0);
    }

    /// Tauscht die Schlüssel zweier Segmente.
    pub fn swap_segment_keys(&mut self, a: Segment, b: Segment) {
        if a == b {
            return;
        }
        let key_a = self.segments.remove(a);
        let key_b = self.segments.remove(b);
        self.segments.insert(a, key_b);
        self.segments.insert(b, key_a);
    }

    /// Jedes Element des Layouts besitzt genau einen Schlüssel.
    pub fn is_consistent(&self, layout: &Layout) -> bool {
        self.logicitems.len() == layout.logicitem_count()
            && layout
                .logicitem_ids()
                .all(|id| self.logicitems.key(id).is_some())
            && self.decorations.len() == layout.decoration_count()
            && layout
                .decoration_ids()
                .all(|id| self.decorations.key(id).is_some())
            && self.segments.len() == layout.segment_count()
            && layout
                .segments()
                .all(|segment| self.segments.key(segment).is_some())
    }

    pub fn submit(&mut self, message: &InfoMessage) {
        match message {
            InfoMessage::LogicItemCreated { logicitem_id } => {
                let key = LogicItemKey(self.fresh());
                self.logicitems.insert(*logicitem_id, key);
            }
            InfoMessage::LogicItemIdUpdated {
                new_logicitem_id,
                old_logicitem_id,
            } => self.logicitems.rename(*new_logicitem_id, *old_logicitem_id),
            InfoMessage::LogicItemDeleted { logicitem_id } => {
                self.logicitems.remove(*logicitem_id);
            }

            InfoMessage::DecorationCreated { decoration_id } => {
                let key = DecorationKey(self.fresh());
                self.decorations.insert(*decoration_id, key);
            }
            InfoMessage::DecorationIdUpdated {
                new_decoration_id,
                old_decoration_id,
            } => self.decorations.rename(*new_decoration_id, *old_decoration_id),
            InfoMessage::DecorationDeleted { decoration_id } => {
                self.decorations.remove(*decoration_id);
            }

            InfoMessage::SegmentCreated { segment, .. } => {
                let key = SegmentKey(self.fresh());
                self.segments.insert(*segment, key);
            }
            InfoMessage::SegmentIdUpdated {
                new_segment,
                old_segment,
            } => self.segments.rename(*new_segment, *old_segment),
            InfoMessage::SegmentPartMoved {
                destination,
                source,
                create_destination,
                delete_source,
            } => match (create_destination, delete_source) {
                // ganzes Segment wechselt den Baum
                (true, true) => self.segments.rename(destination.segment, source.segment),
                // Abspaltung
                (true, false) => {
                    let key = SegmentKey(self.fresh());
                    self.segments.insert(destination.segment, key);
                }
                // Verschmelzung
                (false, true) => {
                    self.segments.remove(source.segment);
                }
                (false, false) => {}
            },
            InfoMessage::SegmentPartDeleted {
                segment_part,
                delete_segment,
            } => {
                if *delete_segment {
                    self.segments.remove(segment_part.segment);
                }
            }
            _ => {}
        }
    }
}
