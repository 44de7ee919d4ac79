//! Optionales Protokoll aller verschickten Änderungsnachrichten.

use crate::core::InfoMessage;

/// Speichert verschickte Nachrichten in Reihenfolge.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: Vec<InfoMessage>,
    capacity: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl MessageLog {
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// Erstellt ein leeres Log mit Obergrenze (mindestens 2 Einträge).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(2),
        }
    }

    /// Fügt eine Nachricht hinzu.
    /// Ist die Obergrenze erreicht, wird die ältere Hälfte verworfen.
    pub fn record(&mut self, message: &InfoMessage) {
        if self.entries.len() >= self.capacity {
            self.entries.drain(..self.capacity / 2);
        }
        self.entries.push(message.clone());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[InfoMessage] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogicItemId;

    fn created(id: u32) -> InfoMessage {
        InfoMessage::LogicItemCreated {
            logicitem_id: LogicItemId(id),
        }
    }

    #[test]
    fn drops_older_half_when_full() {
        let mut log = MessageLog::new(4);
        for id in 0..5 {
            log.record(&created(id));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.entries()[0], created(2));
        assert_eq!(log.entries()[2], created(4));
    }
}
