//! Application-Layer: zustandsbehaftete Editier-Engine.
//!
//! `CircuitData` hält Layout und alle abgeleiteten Zustände, die freien
//! Funktionen in `editing` ändern sie, der `Modifier` ist die öffentliche
//! Fassade darüber.

pub mod circuit_data;
/// Editieroperationen für Logikelemente, Dekorationen und Leitungen
pub mod editing;
pub mod history;
pub mod key_state;
pub mod message_log;
pub mod modifier;
/// Maus-Werkzeuge als geschlossener Summentyp
pub mod mouse_tool;
pub mod random_circuit;
pub mod selection_store;
pub mod visible_selection;

pub use circuit_data::CircuitData;
pub use history::{History, HistoryEntry, HistoryState};
pub use key_state::{KeyStateEntry, LayoutKeyState};
pub use message_log::MessageLog;
pub use modifier::{Modifier, ModifierConfig};
pub use mouse_tool::{MouseTool, SettingTarget};
pub use random_circuit::{add_random_circuit, RandomCircuitStats};
pub use selection_store::{SelectionId, SelectionStore};
pub use visible_selection::{SelectionFunction, VisibleSelection};
