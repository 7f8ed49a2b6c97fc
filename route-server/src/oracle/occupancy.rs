//! Occupancy estimation.
//!
//! The planner asks an [`OccupancyOracle`] how full a trip will be when
//! boarded at a given instant. Estimates are advisory: a missing value is
//! reported as unknown and never stops a search.

use std::collections::HashMap;

use chrono::{Datelike, NaiveTime, Weekday};

use crate::domain::{Occupancy, RailTime, StationName, Trip};

/// Estimates per-station load for a trip.
///
/// Implementations are called concurrently from many searches and must not
/// block.
pub trait OccupancyOracle: Send + Sync {
    /// Estimated occupancy at each station of `trip` when it runs at `at`.
    fn estimate(&self, trip: &Trip, at: RailTime) -> HashMap<StationName, Occupancy>;
}

/// Oracle that knows nothing. Every leg reports unknown occupancy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOccupancy;

impl OccupancyOracle for NoOccupancy {
    fn estimate(&self, _trip: &Trip, _at: RailTime) -> HashMap<StationName, Occupancy> {
        HashMap::new()
    }
}

/// Coarse demand period used to pick a curve height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandPeriod {
    /// Weekday 05:30-08:30 or 15:30-19:00
    Peak,
    /// Saturday or Sunday
    Weekend,
    /// Any other time
    OffPeak,
}

impl DemandPeriod {
    /// Classify an instant.
    pub fn at(at: RailTime) -> Self {
        if matches!(at.date().weekday(), Weekday::Sat | Weekday::Sun) {
            return DemandPeriod::Weekend;
        }

        let t = at.time();
        let in_range = |from: (u32, u32), to: (u32, u32)| {
            let from = NaiveTime::from_hms_opt(from.0, from.1, 0).unwrap_or(NaiveTime::MIN);
            let to = NaiveTime::from_hms_opt(to.0, to.1, 0).unwrap_or(NaiveTime::MIN);
            from <= t && t < to
        };

        if in_range((5, 30), (8, 30)) || in_range((15, 30), (19, 0)) {
            DemandPeriod::Peak
        } else {
            DemandPeriod::OffPeak
        }
    }
}

/// Triangular load model.
///
/// Load rises linearly from `base` at the first stop to a period-dependent
/// peak at the peak station (or mid-route if the trip does not call there),
/// then falls linearly back to `base` at the terminus.
#[derive(Debug, Clone)]
pub struct CurveOccupancy {
    /// Load at the ends of the curve
    pub base: i32,
    /// Peak load in weekday rush hours
    pub peak_rush: i32,
    /// Peak load at weekends
    pub peak_weekend: i32,
    /// Peak load at other times
    pub peak_off: i32,
    /// Station where the curve peaks, when the trip calls there
    pub peak_station: Option<StationName>,
}

impl Default for CurveOccupancy {
    fn default() -> Self {
        Self {
            base: 20,
            peak_rush: 110,
            peak_weekend: 85,
            peak_off: 65,
            peak_station: StationName::parse("manggarai").ok(),
        }
    }
}

impl CurveOccupancy {
    /// Peak load for a period.
    pub fn peak_for(&self, period: DemandPeriod) -> i32 {
        match period {
            DemandPeriod::Peak => self.peak_rush,
            DemandPeriod::Weekend => self.peak_weekend,
            DemandPeriod::OffPeak => self.peak_off,
        }
    }

    fn peak_index(&self, trip: &Trip) -> usize {
        self.peak_station
            .as_ref()
            .and_then(|s| trip.stop_index(s))
            .map(|idx| idx.0)
            .unwrap_or(trip.stops().len() / 2)
    }
}

impl OccupancyOracle for CurveOccupancy {
    fn estimate(&self, trip: &Trip, at: RailTime) -> HashMap<StationName, Occupancy> {
        let n = trip.stops().len();
        if n == 0 {
            return HashMap::new();
        }

        let peak = f64::from(self.peak_for(DemandPeriod::at(at)));
        let base = f64::from(self.base);
        let peak_idx = self.peak_index(trip);

        trip.stops()
            .iter()
            .enumerate()
            .map(|(i, stop)| {
                let load = if i <= peak_idx {
                    if peak_idx == 0 {
                        peak
                    } else {
                        base + (peak - base) * (i as f64 / peak_idx as f64)
                    }
                } else {
                    let tail = n - 1 - peak_idx;
                    if tail == 0 {
                        base
                    } else {
                        peak - (peak - base) * ((i - peak_idx) as f64 / tail as f64)
                    }
                };
                (stop.station.clone(), Occupancy::percent(load as i32))
            })
            .collect()
    }
}
