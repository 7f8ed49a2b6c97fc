//! Fare calculation.
//!
//! Fares are display-only: they are attached to itineraries after selection
//! and never influence the search.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::{RegionTag, StationName};

/// Computes a fare for a ride through `stations` in `region`.
pub trait FareCalculator: Send + Sync {
    /// Fare in integer currency units. Unknown regions cost 0.
    fn compute(&self, stations: &[StationName], region: &RegionTag) -> u32;
}

/// How a region prices a ride.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FareRule {
    /// One price regardless of distance
    Flat { fare: u32 },
    /// `base_fare` up to `base_km`, then `step_fare` per started `step_km`
    Distance {
        base_fare: u32,
        base_km: f64,
        step_fare: u32,
        step_km: f64,
    },
}

/// A region's fare rule as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFare {
    pub region: RegionTag,
    #[serde(flatten)]
    pub rule: FareRule,
}

/// Distance between two adjacent stations, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub from: StationName,
    pub to: StationName,
    pub km: f64,
}

/// Serialised form of a fare table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareConfig {
    #[serde(default)]
    pub regions: Vec<RegionFare>,

    #[serde(default)]
    pub distances: Vec<DistanceEntry>,

    /// Distance assumed for adjacent stations missing from `distances`
    #[serde(default = "default_distance_km")]
    pub default_distance_km: f64,
}

fn default_distance_km() -> f64 {
    2.0
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            distances: Vec::new(),
            default_distance_km: default_distance_km(),
        }
    }
}

/// Region-keyed fare table with an adjacent-station distance map.
///
/// Distances are held in whole metres so block counting is exact.
#[derive(Debug, Clone, Default)]
pub struct DistanceFareTable {
    rules: HashMap<RegionTag, FareRule>,
    distances: HashMap<(StationName, StationName), u32>,
    default_m: u32,
}

fn metres(km: f64) -> u32 {
    (km * 1000.0).round().max(0.0) as u32
}

impl DistanceFareTable {
    /// Build a table from configuration.
    pub fn new(config: FareConfig) -> Self {
        let rules = config
            .regions
            .into_iter()
            .map(|r| (r.region, r.rule))
            .collect();

        let mut distances = HashMap::new();
        for entry in config.distances {
            let m = metres(entry.km);
            distances.insert((entry.from.clone(), entry.to.clone()), m);
            distances.insert((entry.to, entry.from), m);
        }

        Self {
            rules,
            distances,
            default_m: metres(config.default_distance_km),
        }
    }

    /// Distance between adjacent stations in metres, or the default.
    pub fn segment_metres(&self, a: &StationName, b: &StationName) -> u32 {
        self.distances
            .get(&(a.clone(), b.clone()))
            .copied()
            .unwrap_or(self.default_m)
    }

    /// Total distance along a station sequence, in metres.
    ///
    /// The sequence is first cut to its simple path.
    pub fn path_metres(&self, stations: &[StationName]) -> u32 {
        simple_path(stations)
            .windows(2)
            .map(|pair| self.segment_metres(pair[0], pair[1]))
            .sum()
    }
}

impl FareCalculator for DistanceFareTable {
    fn compute(&self, stations: &[StationName], region: &RegionTag) -> u32 {
        match self.rules.get(region) {
            Some(FareRule::Flat { fare }) => *fare,
            Some(FareRule::Distance {
                base_fare,
                base_km,
                step_fare,
                step_km,
            }) => {
                let distance = self.path_metres(stations);
                let base = metres(*base_km);
                if distance <= base {
                    return *base_fare;
                }
                let step = metres(*step_km).max(1);
                let blocks = (distance - base).div_ceil(step);
                base_fare + step_fare * blocks
            }
            None => 0,
        }
    }
}

/// Prefix of `stations` before the first repeat, plus the final station if
/// the cut dropped it.
fn simple_path(stations: &[StationName]) -> Vec<&StationName> {
    let mut seen = HashSet::new();
    let mut path = Vec::with_capacity(stations.len());
    for station in stations {
        if !seen.insert(station) {
            break;
        }
        path.push(station);
    }
    if let Some(last) = stations.last() {
        if !path.contains(&last) {
            path.push(last);
        }
    }
    path
}
