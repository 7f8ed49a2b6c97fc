//! Station name types.

use std::fmt;
use std::sync::Arc;

/// Error returned when a station name normalises to nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name {raw:?}: {reason}")]
pub struct InvalidStationName {
    raw: String,
    reason: &'static str,
}

/// A normalised station name, used as the station's identity.
///
/// Source timetables carry free-form names ("Manggarai (MRI)", "  BOGOR ").
/// Every name is passed through [`StationName::normalize`] exactly once, at
/// construction, so two `StationName`s compare equal iff they denote the same
/// station. The backing string is shared, so cloning is a reference-count bump.
///
/// # Examples
///
/// ```
/// use route_server::domain::StationName;
///
/// let a = StationName::parse("Manggarai (MRI)").unwrap();
/// let b = StationName::parse("  MANGGARAI ").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "manggarai");
///
/// // Nothing left after normalisation
/// assert!(StationName::parse(" (closed) ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationName(Arc<str>);

impl StationName {
    /// Parse and normalise a raw station name.
    pub fn parse(raw: &str) -> Result<Self, InvalidStationName> {
        let normalized = Self::normalize(raw);
        if normalized.is_empty() {
            return Err(InvalidStationName {
                raw: raw.to_string(),
                reason: "empty after normalisation",
            });
        }
        Ok(Self(normalized.into()))
    }

    /// The normalisation applied to every station name.
    ///
    /// Drops everything from the first `(` onwards, folds case, trims, and
    /// collapses internal runs of whitespace to a single space.
    pub fn normalize(raw: &str) -> String {
        let head = raw.split('(').next().unwrap_or("");
        head.split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns the normalised name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `fragment` (normalised) occurs inside this name.
    pub fn contains(&self, fragment: &str) -> bool {
        let fragment = Self::normalize(fragment);
        !fragment.is_empty() && self.0.contains(fragment.as_str())
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.as_str())
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for StationName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for StationName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        StationName::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_parenthetical_qualifier() {
        let name = StationName::parse("Tanah Abang (THB)").unwrap();
        assert_eq!(name.as_str(), "tanah abang");
    }

    #[test]
    fn folds_case_and_whitespace() {
        let name = StationName::parse("  Jakarta   KOTA\t").unwrap();
        assert_eq!(name.as_str(), "jakarta kota");
    }

    #[test]
    fn reject_empty() {
        assert!(StationName::parse("").is_err());
        assert!(StationName::parse("   ").is_err());
        assert!(StationName::parse("(x)").is_err());
    }

    #[test]
    fn contains_uses_normalised_fragment() {
        let name = StationName::parse("Rangkasbitung").unwrap();
        assert!(name.contains("RANGKAS"));
        assert!(!name.contains("merak"));
        assert!(!name.contains("   "));
    }

    #[test]
    fn display_and_debug() {
        let name = StationName::parse("Bogor").unwrap();
        assert_eq!(format!("{name}"), "bogor");
        assert_eq!(format!("{name:?}"), "StationName(bogor)");
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(StationName::parse("Duri").unwrap());
        assert!(set.contains(&StationName::parse("DURI (DU)").unwrap()));
        assert!(!set.contains(&StationName::parse("Angke").unwrap()));
    }

    #[test]
    fn deserialize_normalises() {
        let name: StationName = serde_json::from_str("\"Pasar Minggu Baru (PSMB)\"").unwrap();
        assert_eq!(name.as_str(), "pasar minggu baru");
        assert!(serde_json::from_str::<StationName>("\"()\"").is_err());
    }
}
