//! Occupancy estimates.

use std::fmt;

use serde::{Serialize, Serializer};

/// Estimated load of a vehicle as a percentage of capacity.
///
/// Known values are clamped to `0..=200`. `Unknown` is a normal outcome
/// (the oracle had nothing for that station), and is reported as `-1`
/// on the wire.
///
/// ```
/// use route_server::domain::Occupancy;
///
/// assert_eq!(Occupancy::percent(250), Occupancy::percent(200));
/// assert_eq!(Occupancy::percent(-5).value(), 0);
/// assert_eq!(Occupancy::Unknown.value(), -1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Occupancy {
    /// Percentage of capacity, 0..=200
    Known(u8),
    /// No estimate available
    #[default]
    Unknown,
}

impl Occupancy {
    /// Upper bound of a known estimate.
    pub const MAX: i32 = 200;

    /// The sentinel used where a plain integer is required.
    pub const UNKNOWN_SENTINEL: i32 = -1;

    /// A known estimate, clamped to the valid range.
    pub fn percent(value: i32) -> Self {
        Occupancy::Known(value.clamp(0, Self::MAX) as u8)
    }

    /// Integer form, with `-1` for unknown.
    pub fn value(&self) -> i32 {
        match self {
            Occupancy::Known(p) => i32::from(*p),
            Occupancy::Unknown => Self::UNKNOWN_SENTINEL,
        }
    }

    /// Returns true if an estimate is present.
    pub fn is_known(&self) -> bool {
        matches!(self, Occupancy::Known(_))
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupancy::Known(p) => write!(f, "{p}%"),
            Occupancy::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for Occupancy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.value())
    }
}
