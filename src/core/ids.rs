//! Identifikatoren für Elemente des Layouts.
//!
//! Ids sind dichte Indizes und ändern sich beim Löschen (Swap-Remove).
//! Keys sind stabil und werden nie wiederverwendet.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::Part;

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }

            pub fn from_index(index: usize) -> Self {
                match u32::try_from(index) {
                    Ok(value) => Self(value),
                    Err(_) => panic!("{} {index} nicht darstellbar", $prefix),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

dense_id!(
    /// Index eines Logikelements im Layout.
    LogicItemId,
    "logicitem_"
);
dense_id!(
    /// Index einer Dekoration im Layout.
    DecorationId,
    "decoration_"
);
dense_id!(
    /// Index eines Segmentbaums.
    WireId,
    "wire_"
);
dense_id!(
    /// Index eines Segments innerhalb seines Baums.
    SegmentIndex,
    "segment_"
);

impl WireId {
    /// Sammelbaum aller temporären Segmente.
    pub const TEMPORARY: WireId = WireId(0);
    /// Sammelbaum aller kollidierenden Segmente.
    pub const COLLIDING: WireId = WireId(1);
    /// Erste Id eines eingefügten Baums.
    pub const FIRST_INSERTED: WireId = WireId(2);

    pub fn is_temporary(self) -> bool {
        self == Self::TEMPORARY
    }

    pub fn is_colliding(self) -> bool {
        self == Self::COLLIDING
    }

    pub fn is_inserted(self) -> bool {
        self >= Self::FIRST_INSERTED
    }
}

/// Ein Segment eines bestimmten Baums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub wire_id: WireId,
    pub segment_index: SegmentIndex,
}

impl Segment {
    pub fn new(wire_id: WireId, segment_index: SegmentIndex) -> Self {
        Self {
            wire_id,
            segment_index,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.wire_id, self.segment_index)
    }
}

/// Teilbereich eines Segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentPart {
    pub segment: Segment,
    pub part: Part,
}

impl fmt::Display for SegmentPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.segment, self.part)
    }
}

macro_rules! stable_key {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

stable_key!(
    /// Stabiler Schlüssel eines Logikelements.
    LogicItemKey,
    "logicitem_key_"
);
stable_key!(
    /// Stabiler Schlüssel einer Dekoration.
    DecorationKey,
    "decoration_key_"
);
stable_key!(
    /// Stabiler Schlüssel eines Segments.
    SegmentKey,
    "segment_key_"
);
