//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Konfiguration und den Vertrag mit dem externen Simulator.

pub mod options;
pub mod signal_history;

pub use options::{EngineOptions, RandomCircuitOptions};
pub use signal_history::value_extrapolated;
