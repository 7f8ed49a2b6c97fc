//! Interchange stations and the lines that may be exchanged there.
//!
//! Changing trips is only allowed at registered interchanges, and only
//! between lines that station serves. Continuing on the same trip is never
//! checked here.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::{LineId, StationName};

/// One interchange entry as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterchangeEntry {
    pub station: StationName,
    pub lines: Vec<LineId>,
}

/// Static table of interchange stations.
#[derive(Debug, Clone, Default)]
pub struct InterchangePolicy {
    allowed: HashMap<StationName, HashSet<LineId>>,
}

impl InterchangePolicy {
    /// Create an empty policy. Nothing may be exchanged anywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a policy from configuration entries.
    ///
    /// Entries naming the same station are merged.
    pub fn from_entries(entries: impl IntoIterator<Item = InterchangeEntry>) -> Self {
        let mut policy = Self::new();
        for entry in entries {
            policy.register(entry.station, entry.lines);
        }
        policy
    }

    /// Register `lines` as exchangeable at `station`.
    pub fn register(&mut self, station: StationName, lines: impl IntoIterator<Item = LineId>) {
        self.allowed.entry(station).or_default().extend(lines);
    }

    /// Returns true if a change from `from_line` to `to_line` is allowed at
    /// `station`.
    ///
    /// ```
    /// use route_server::domain::{LineId, StationName};
    /// use route_server::interchange::InterchangePolicyBuilder;
    ///
    /// let policy = InterchangePolicyBuilder::new()
    ///     .allow("Manggarai", &["bogor", "cikarang"])
    ///     .build();
    /// let manggarai = StationName::parse("Manggarai").unwrap();
    ///
    /// assert!(policy.can_transfer(&manggarai, &LineId::new("bogor"), &LineId::new("cikarang")));
    /// assert!(!policy.can_transfer(&manggarai, &LineId::new("bogor"), &LineId::new("tangerang")));
    /// ```
    pub fn can_transfer(&self, station: &StationName, from_line: &LineId, to_line: &LineId) -> bool {
        self.allowed
            .get(station)
            .is_some_and(|lines| lines.contains(from_line) && lines.contains(to_line))
    }

    /// Returns true if `station` is a registered interchange.
    pub fn is_interchange(&self, station: &StationName) -> bool {
        self.allowed.contains_key(station)
    }

    /// Lines exchangeable at `station`, sorted.
    pub fn lines_at(&self, station: &StationName) -> Vec<&LineId> {
        let mut lines: Vec<_> = self
            .allowed
            .get(station)
            .map(|set| set.iter().collect())
            .unwrap_or_default();
        lines.sort();
        lines
    }

    /// Returns the number of interchange stations.
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    /// Returns true if no interchange is registered.
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// Builder for creating an interchange policy from raw names.
#[derive(Debug, Default)]
pub struct InterchangePolicyBuilder {
    inner: InterchangePolicy,
}

impl InterchangePolicyBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow changing between `lines` at `station`.
    ///
    /// Names that normalise to nothing are ignored.
    pub fn allow(mut self, station: &str, lines: &[&str]) -> Self {
        if let Ok(station) = StationName::parse(station) {
            self.inner
                .register(station, lines.iter().map(|l| LineId::new(l)));
        }
        self
    }

    /// Build the policy.
    pub fn build(self) -> InterchangePolicy {
        self.inner
    }
}

/// The Jabodetabek commuter network's interchanges.
pub fn jabodetabek_interchanges() -> InterchangePolicy {
    InterchangePolicyBuilder::new()
        .allow("Manggarai", &["bogor", "cikarang"])
        .allow("Tanah Abang", &["cikarang", "rangkasbitung"])
        .allow("Duri", &["cikarang", "tangerang"])
        .allow("Kampung Bandan", &["cikarang", "tanjung priok"])
        .allow("Jakarta Kota", &["bogor", "tanjung priok"])
        .build()
}
