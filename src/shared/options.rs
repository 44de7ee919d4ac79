//! Zentrale Konfiguration der Editier-Engine.
//!
//! `EngineOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Modifier ────────────────────────────────────────────────────────

/// Undo/Redo ist standardmäßig aktiv.
pub const ENABLE_HISTORY: bool = true;
/// Verschickte Nachrichten werden nicht protokolliert.
pub const STORE_MESSAGES: bool = false;
/// Indizes werden nach jeder Operation nicht gegen einen Neuaufbau geprüft.
pub const VALIDATE_MESSAGES: bool = false;
/// Obergrenze des Nachrichtenprotokolls.
pub const MESSAGE_LOG_CAPACITY: usize = 1000;

// ── Zufallsschaltungen ──────────────────────────────────────────────

pub const RANDOM_SEED: u64 = 0;
pub const RANDOM_LOGICITEM_COUNT: usize = 20;
pub const RANDOM_WIRE_COUNT: usize = 40;
pub const RANDOM_DECORATION_COUNT: usize = 2;
/// Koordinatenbereich `[min, max]` für beide Achsen.
pub const RANDOM_GRID_MIN: i16 = 0;
pub const RANDOM_GRID_MAX: i16 = 40;
/// Maximale Länge zufälliger Leitungen in Gittereinheiten.
pub const RANDOM_MAX_WIRE_LENGTH: u16 = 8;

/// Parameter für zufällig erzeugte Schaltungen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomCircuitOptions {
    pub seed: u64,
    pub logicitem_count: usize,
    pub wire_count: usize,
    #[serde(default = "default_random_decoration_count")]
    pub decoration_count: usize,
    pub grid_min: i16,
    pub grid_max: i16,
    pub max_wire_length: u16,
}

impl Default for RandomCircuitOptions {
    fn default() -> Self {
        Self {
            seed: RANDOM_SEED,
            logicitem_count: RANDOM_LOGICITEM_COUNT,
            wire_count: RANDOM_WIRE_COUNT,
            decoration_count: RANDOM_DECORATION_COUNT,
            grid_min: RANDOM_GRID_MIN,
            grid_max: RANDOM_GRID_MAX,
            max_wire_length: RANDOM_MAX_WIRE_LENGTH,
        }
    }
}

fn default_random_decoration_count() -> usize {
    RANDOM_DECORATION_COUNT
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Engine-Optionen.
/// Wird als `editable_circuit.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Undo/Redo aufzeichnen
    pub enable_history: bool,
    /// Verschickte Nachrichten protokollieren
    pub store_messages: bool,
    /// Indizes und Selektionen nach jeder Operation prüfen (teuer)
    pub validate_messages: bool,
    /// Obergrenze des Nachrichtenprotokolls
    #[serde(default = "default_message_log_capacity")]
    pub message_log_capacity: usize,

    // ── Zufallsschaltungen ──────────────────────────────────────
    #[serde(default)]
    pub random: RandomCircuitOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            enable_history: ENABLE_HISTORY,
            store_messages: STORE_MESSAGES,
            validate_messages: VALIDATE_MESSAGES,
            message_log_capacity: MESSAGE_LOG_CAPACITY,
            random: RandomCircuitOptions::default(),
        }
    }
}

/// Serde-Default für `message_log_capacity` (Abwärtskompatibilität).
fn default_message_log_capacity() -> usize {
    MESSAGE_LOG_CAPACITY
}

impl EngineOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("editable-circuit"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("editable_circuit.toml")
    }
}
