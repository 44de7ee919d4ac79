//! Übergabevertrag an den Simulator: alternierende Signalverläufe.
//!
//! Ein Verlauf speichert nur Flanken, jede Flanke kehrt den Wert um. Werte
//! außerhalb des gespeicherten Bereichs werden über die Parität des Abstands
//! fortgeschrieben.

/// Wert eines alternierenden Verlaufs an `index`.
///
/// `last_value` ist der Wert nach der letzten gespeicherten Flanke
/// (`history_len - 1`). Negative Abstände, also Indizes vor dem Verlauf,
/// werden vorzeichenrichtig modulo 2 behandelt.
pub fn value_extrapolated(history_len: usize, index: i64, last_value: bool) -> bool {
    // i128 fasst jeden Abstand zwischen i64 und usize ohne Überlauf
    let last_index = history_len as i128 - 1;
    let distance = i128::from(index) - last_index;
    if distance.rem_euclid(2) == 0 {
        last_value
    } else {
        !last_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parity_alternates_after_history() {
        assert!(value_extrapolated(3, 2, true));
        assert!(!value_extrapolated(3, 3, true));
        assert!(value_extrapolated(3, 4, true));
    }

    #[test]
    fn negative_distance_uses_euclidean_remainder() {
        // Abstand -3 ist ungerade, Abstand -4 gerade
        assert!(!value_extrapolated(3, -1, true));
        assert!(value_extrapolated(3, -2, true));
        assert!(!value_extrapolated(0, -1, false));
    }

    #[test]
    fn extreme_indices_do_not_overflow() {
        // Abstand i64::MIN - 2 ist gerade
        assert!(value_extrapolated(3, i64::MIN, true));
        assert!(value_extrapolated(usize::MAX, i64::MIN, true));
        assert!(!value_extrapolated(0, i64::MAX, false));
    }
}
