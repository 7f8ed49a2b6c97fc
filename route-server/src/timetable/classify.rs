//! Table-driven line, direction and region classification.
//!
//! A trip's line is not published in the source data; it is inferred from
//! the trip's stop list. Rather than hard-coding one branch per known route,
//! classification is a first-match scan over a list of rules loaded from
//! configuration, so new services only need a new rule entry.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{LineId, RegionTag, StationName, Stop, Trip};

/// One line rule. Every condition that is present must hold.
///
/// Station fragments are matched as substrings of normalised names, so
/// `"bogor"` matches a terminus called `"Bogor (BOO)"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierRule {
    /// Line assigned when the rule matches
    pub line: LineId,

    /// Optional directional tag, e.g. `bogor-jakarta kota`
    #[serde(default)]
    pub direction: Option<String>,

    /// Fragment the first station must contain
    #[serde(default)]
    pub first: Option<String>,

    /// Fragment the last station must contain
    #[serde(default)]
    pub last: Option<String>,

    /// At least one stop must contain one of these fragments
    #[serde(default)]
    pub via_any: Vec<String>,
}

impl ClassifierRule {
    /// Rule that matches by first and last station.
    pub fn terminals(line: &str, first: &str, last: &str) -> Self {
        Self {
            line: LineId::new(line),
            direction: Some(format!(
                "{}-{}",
                StationName::normalize(first),
                StationName::normalize(last)
            )),
            first: Some(first.to_string()),
            last: Some(last.to_string()),
            via_any: Vec::new(),
        }
    }

    /// Rule that matches any trip calling at one of `stations`.
    pub fn via(line: &str, stations: &[&str]) -> Self {
        Self {
            line: LineId::new(line),
            direction: None,
            first: None,
            last: None,
            via_any: stations.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn matches(&self, stops: &[Stop]) -> bool {
        let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
            return false;
        };

        if let Some(fragment) = &self.first {
            if !first.station.contains(fragment) {
                return false;
            }
        }
        if let Some(fragment) = &self.last {
            if !last.station.contains(fragment) {
                return false;
            }
        }
        if !self.via_any.is_empty() {
            let hit = stops
                .iter()
                .any(|stop| self.via_any.iter().any(|f| stop.station.contains(f)));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// A region is assigned when any stop is one of `stations` (exact match
/// after normalisation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRule {
    /// Region assigned when the rule matches
    pub region: RegionTag,
    /// Member stations
    pub stations: Vec<StationName>,
}

/// Serialised form of a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Line rules, first match wins
    #[serde(default)]
    pub rules: Vec<ClassifierRule>,

    /// Region rules, first match wins
    #[serde(default)]
    pub regions: Vec<RegionRule>,

    /// Region used when no region rule matches
    #[serde(default = "default_region")]
    pub default_region: RegionTag,
}

fn default_region() -> RegionTag {
    RegionTag::new(Trip::DEFAULT_REGION)
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            regions: Vec::new(),
            default_region: default_region(),
        }
    }
}

/// Result of classifying one stop list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub line: LineId,
    pub direction: Option<String>,
    pub region: RegionTag,
}

/// Classifies trips by scanning rule tables.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    rules: Vec<ClassifierRule>,
    regions: Vec<(RegionTag, HashSet<StationName>)>,
    default_region: RegionTag,
}

impl LineClassifier {
    /// Build a classifier from its configuration.
    pub fn new(config: ClassifierConfig) -> Self {
        let regions = config
            .regions
            .into_iter()
            .map(|r| (r.region, r.stations.into_iter().collect()))
            .collect();

        Self {
            rules: config.rules,
            regions,
            default_region: config.default_region,
        }
    }

    /// Classify a stop list.
    pub fn classify(&self, stops: &[Stop]) -> Classification {
        let region = self
            .regions
            .iter()
            .find(|(_, members)| stops.iter().any(|s| members.contains(&s.station)))
            .map(|(region, _)| region.clone())
            .unwrap_or_else(|| self.default_region.clone());

        match self.rules.iter().find(|rule| rule.matches(stops)) {
            Some(rule) => Classification {
                line: rule.line.clone(),
                direction: rule.direction.clone(),
                region,
            },
            None => Classification {
                line: LineId::unknown(),
                direction: None,
                region,
            },
        }
    }

    /// Classify a trip and stamp the result on it.
    pub fn apply(&self, trip: Trip) -> Trip {
        let class = self.classify(trip.stops());
        trip.with_line(class.line)
            .with_direction(class.direction)
            .with_region(class.region)
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}
