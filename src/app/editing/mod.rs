//! Editieroperationen auf [`CircuitData`](super::circuit_data::CircuitData).
//!
//! Freie Funktionen, die Layout, Indizes, Selektionen und History gemeinsam
//! fortschreiben. Öffentlicher Einstieg ist der [`Modifier`](super::modifier::Modifier).

pub mod decoration;
pub mod history;
pub mod logicitem;
pub mod visible_selection;
pub mod wire;
pub mod wire_detail;
