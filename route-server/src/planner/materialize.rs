//! Leg materialisation.
//!
//! Turns "board trip T at stop i, no earlier than instant F" into concrete,
//! dated legs: one per later stop the traveller could alight at.

use std::sync::Arc;

use chrono::Duration;
use tracing::trace;

use crate::domain::{Leg, Occupancy, RailTime, StopIndex, Trip};
use crate::oracle::OccupancyOracle;

/// Builds candidate legs for one boarding.
pub struct LegMaterializer<'a> {
    oracle: &'a dyn OccupancyOracle,
}

impl<'a> LegMaterializer<'a> {
    /// Create a materializer that asks `oracle` for occupancy.
    pub fn new(oracle: &'a dyn OccupancyOracle) -> Self {
        Self { oracle }
    }

    /// Resolve the boarding instant of `trip` at `board_idx`.
    ///
    /// The stop's time-of-day is placed at or after `floor`, rolling to the
    /// next day if needed. Returns `None` if the stop has no time, or if the
    /// departure lies more than `window` after `floor`.
    pub fn boarding_instant(
        &self,
        trip: &Trip,
        board_idx: StopIndex,
        floor: RailTime,
        window: Duration,
    ) -> Option<RailTime> {
        let Some(scheduled) = trip.stop(board_idx).and_then(|s| s.departure) else {
            trace!(trip = %trip.id(), index = %board_idx, "boarding stop has no time; skipped");
            return None;
        };
        let departure = floor.resolve_on_or_after(scheduled)?;
        if departure.signed_duration_since(floor) > window {
            return None;
        }
        Some(departure)
    }

    /// Every leg from boarding `trip` at `board_idx` to each later stop.
    ///
    /// Alighting times are resolved relative to the boarding instant, so a
    /// trip running past midnight yields next-day arrivals. Stops without a
    /// time are skipped. Legs come back in stop order.
    pub fn make_legs(
        &self,
        trip: &Arc<Trip>,
        board_idx: StopIndex,
        floor: RailTime,
        window: Duration,
    ) -> Vec<Leg> {
        let Some(departure) = self.boarding_instant(trip, board_idx, floor, window) else {
            return Vec::new();
        };

        let occupancy = self.occupancy_at(trip, board_idx, departure);

        let mut legs = Vec::new();
        let mut ready = departure;
        for (idx, stop) in trip.stops().iter().enumerate().skip(board_idx.0 + 1) {
            let Some(scheduled) = stop.departure else {
                trace!(trip = %trip.id(), index = idx, "alighting stop has no time; skipped");
                continue;
            };
            // Chain from the previous stop so several midnights are handled
            let Some(arrival) = ready.resolve_on_or_after(scheduled) else {
                continue;
            };
            if arrival <= departure {
                continue;
            }
            ready = arrival;

            match Leg::new(
                trip.clone(),
                board_idx,
                StopIndex(idx),
                departure,
                arrival,
                occupancy,
            ) {
                Ok(leg) => legs.push(leg),
                Err(e) => trace!(trip = %trip.id(), index = idx, error = %e, "leg rejected"),
            }
        }
        legs
    }

    /// Occupancy on boarding, unknown if the oracle has nothing for the
    /// boarding station.
    fn occupancy_at(&self, trip: &Trip, board_idx: StopIndex, at: RailTime) -> Occupancy {
        let Some(stop) = trip.stop(board_idx) else {
            return Occupancy::Unknown;
        };
        self.oracle
            .estimate(trip, at)
            .get(&stop.station)
            .copied()
            .unwrap_or(Occupancy::Unknown)
    }
}
