use std::collections::HashMap;
use std::hash::Hash;

use crate::model::{Direction, StationId, Trip};

/// Counts trips grouped by `key`.
///
/// Only keys that occur in `trips` are present; there are no zero entries.
pub fn rollup<'a, K, I, F>(trips: I, key: F) -> HashMap<K, usize>
where
    I: IntoIterator<Item = &'a Trip>,
    F: Fn(&'a Trip) -> K,
    K: Eq + Hash,
{
    let mut counts = HashMap::new();
    for trip in trips {
        *counts.entry(key(trip)).or_insert(0) += 1;
    }
    counts
}

/// Per-station counts of departures (by start station) or arrivals (by end station).
pub fn station_counts<'a, I>(trips: I, direction: Direction) -> HashMap<&'a StationId, usize>
where
    I: IntoIterator<Item = &'a Trip>,
{
    rollup(trips, |t| direction.station_of(t))
}
