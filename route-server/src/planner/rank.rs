//! Itinerary selection for search results.
//!
//! Narrows the candidates found by the search down to a few alternatives
//! worth showing: fastest first, none much slower than the best.

use std::cmp::Ordering;

use chrono::Duration;

use crate::domain::Itinerary;

/// Select the itineraries to present.
///
/// 1. Collapse duplicates ([`deduplicate`])
/// 2. Rank by duration, then leg count ([`rank_itineraries`])
/// 3. Drop anything slower than the fastest by more than `tolerance`
/// 4. Keep at most `count`
///
/// The fastest candidate always survives, so a non-empty input gives a
/// non-empty output whenever `count > 0`.
pub fn select_itineraries(
    candidates: Vec<Itinerary>,
    tolerance: Duration,
    count: usize,
) -> Vec<Itinerary> {
    let ranked = rank_itineraries(deduplicate(candidates));

    let Some(best) = ranked.first().map(Itinerary::total_duration) else {
        return ranked;
    };
    // No representable limit: nothing is too slow
    let limit = best.checked_add(&tolerance);

    ranked
        .into_iter()
        .filter(|it| limit.is_none_or(|limit| it.total_duration() <= limit))
        .take(count)
        .collect()
}

/// Rank itineraries by preference.
///
/// Itineraries are ranked by:
/// 1. Total duration (shorter is better)
/// 2. Number of legs (fewer is better)
///
/// The sort is stable, so ties keep their input order.
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    itineraries.sort_by(|a, b| {
        a.total_duration()
            .cmp(&b.total_duration())
            .then_with(|| a.leg_count().cmp(&b.leg_count()))
    });
    itineraries
}

/// Deduplicate itineraries that are effectively identical.
///
/// Two itineraries are considered duplicates if they:
/// - Depart at the same time
/// - Arrive at the same time
/// - Have the same number of transfers
///
/// When duplicates exist, keeps the one with fewest legs. The output is
/// ordered by arrival, then fewer transfers, then fewer legs.
pub fn deduplicate(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    if itineraries.len() <= 1 {
        return itineraries;
    }

    itineraries.sort_by(|a, b| {
        let arr = a.arrival_time().cmp(&b.arrival_time());
        if arr != Ordering::Equal {
            return arr;
        }
        let transfers = a.transfer_count().cmp(&b.transfer_count());
        if transfers != Ordering::Equal {
            return transfers;
        }
        let dep = a.departure_time().cmp(&b.departure_time());
        if dep != Ordering::Equal {
            return dep;
        }
        a.leg_count().cmp(&b.leg_count())
    });

    // Keep first of each (arrival, transfers, departure) group
    let mut result = Vec::with_capacity(itineraries.len());
    let mut last_key: Option<(_, _, _)> = None;

    for itinerary in itineraries {
        let key = (
            itinerary.arrival_time(),
            itinerary.transfer_count(),
            itinerary.departure_time(),
        );

        if last_key != Some(key) {
            result.push(itinerary);
            last_key = Some(key);
        }
    }

    result
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{
        Leg, Occupancy, RailTime, ScheduledTime, StationName, Stop, StopIndex, Trip, TripId,
    };
    use chrono::Timelike;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn itinerary(i: usize, dep_min: u32, duration: u32) -> Itinerary {
        let base = RailTime::parse_iso("2025-06-14T04:00").unwrap();
        let dep = base + Duration::minutes(i64::from(dep_min));
        let arr = dep + Duration::minutes(i64::from(duration));
        let tod = |t: RailTime| ScheduledTime::from_hm(t.time().hour(), t.time().minute()).unwrap();
        let trip = Arc::new(Trip::new(
            TripId::new(format!("T{i}")),
            "t",
            vec![
                Stop::new(StationName::parse("Bogor").unwrap(), tod(dep)),
                Stop::new(StationName::parse("Manggarai").unwrap(), tod(arr)),
            ],
        ));
        let leg = Leg::new(trip, StopIndex(0), StopIndex(1), dep, arr, Occupancy::Unknown).unwrap();
        Itinerary::new(vec![leg]).unwrap()
    }

    proptest! {
        /// Output respects the quota and the tolerance window
        #[test]
        fn selection_bounds(
            shapes in prop::collection::vec((0u32..600, 1u32..300), 0..20),
            tolerance in 0i64..120,
            count in 1usize..6,
        ) {
            let candidates: Vec<_> = shapes
                .iter()
                .enumerate()
                .map(|(i, (dep, dur))| itinerary(i, *dep, *dur))
                .collect();
            let best = candidates.iter().map(|c| c.total_duration()).min();

            let selected = select_itineraries(candidates.clone(), Duration::minutes(tolerance), count);

            prop_assert!(selected.len() <= count);
            prop_assert_eq!(selected.is_empty(), candidates.is_empty());
            if let Some(best) = best {
                prop_assert_eq!(selected[0].total_duration(), best);
                for it in &selected {
                    prop_assert!(it.total_duration() <= best + Duration::minutes(tolerance));
                }
            }
            for pair in selected.windows(2) {
                prop_assert!(pair[0].total_duration() <= pair[1].total_duration());
            }
        }
    }
}
