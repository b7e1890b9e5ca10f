use crate::model::{Direction, Trip};
use crate::time::MINUTES_PER_DAY;

/// 1440 per-minute slots for one direction, holding positions into the trip list.
#[derive(Debug, Clone)]
pub struct MinuteBuckets {
    slots: Vec<Vec<usize>>,
}

impl MinuteBuckets {
    fn empty() -> Self {
        MinuteBuckets {
            slots: vec![Vec::new(); MINUTES_PER_DAY as usize],
        }
    }

    /// Always 1440.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Trip positions recorded in `minute`, in insertion order.
    pub fn slot(&self, minute: usize) -> &[usize] {
        &self.slots[minute]
    }

    pub(crate) fn slots(&self) -> &[Vec<usize>] {
        &self.slots
    }
}

/// Trips partitioned by the minute of day they depart and arrive.
///
/// Built once from the loaded trips and read-only afterwards. Every trip sits
/// in exactly one departure slot and exactly one arrival slot.
#[derive(Debug, Clone)]
pub struct TimeBucketIndex {
    trips: Vec<Trip>,
    departures_by_minute: MinuteBuckets,
    arrivals_by_minute: MinuteBuckets,
}

impl TimeBucketIndex {
    pub fn build(trips: Vec<Trip>) -> Self {
        let mut departures_by_minute = MinuteBuckets::empty();
        let mut arrivals_by_minute = MinuteBuckets::empty();

        for (pos, trip) in trips.iter().enumerate() {
            departures_by_minute.slots[trip.start_minute().index()].push(pos);
            arrivals_by_minute.slots[trip.end_minute().index()].push(pos);
        }

        TimeBucketIndex {
            trips,
            departures_by_minute,
            arrivals_by_minute,
        }
    }

    /// The full, unfiltered trip list.
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn departures_by_minute(&self) -> &MinuteBuckets {
        &self.departures_by_minute
    }

    pub fn arrivals_by_minute(&self) -> &MinuteBuckets {
        &self.arrivals_by_minute
    }

    pub fn buckets(&self, direction: Direction) -> &MinuteBuckets {
        match direction {
            Direction::Departure => &self.departures_by_minute,
            Direction::Arrival => &self.arrivals_by_minute,
        }
    }

    /// Trips recorded in one slot.
    pub fn slot_trips(&self, direction: Direction, minute: usize) -> impl Iterator<Item = &Trip> {
        self.buckets(direction)
            .slot(minute)
            .iter()
            .map(|&pos| &self.trips[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{three_trips, trip};

    #[test]
    fn test_slot_count_fixed_regardless_of_volume() {
        let empty = TimeBucketIndex::build(vec![]);
        assert_eq!(empty.departures_by_minute().len(), 1440);
        assert_eq!(empty.arrivals_by_minute().len(), 1440);
        assert!(empty.is_empty());

        let index = TimeBucketIndex::build(three_trips());
        assert_eq!(index.departures_by_minute().len(), 1440);
        assert_eq!(index.arrivals_by_minute().len(), 1440);
    }

    #[test]
    fn test_each_trip_in_exactly_one_slot_per_direction() {
        let index = TimeBucketIndex::build(three_trips());

        for direction in [Direction::Departure, Direction::Arrival] {
            for (pos, trip) in index.trips().iter().enumerate() {
                let hits: Vec<usize> = (0..1440)
                    .filter(|&m| index.buckets(direction).slot(m).contains(&pos))
                    .collect();
                assert_eq!(hits, vec![direction.minute_of(trip).index()]);
            }
        }
    }

    #[test]
    fn test_slot_preserves_insertion_order() {
        let trips = vec![
            trip("first", "A", (7, 30), "B", (7, 45)),
            trip("second", "C", (7, 30), "B", (7, 45)),
            trip("third", "A", (7, 30), "D", (8, 0)),
        ];
        let index = TimeBucketIndex::build(trips);

        let ids: Vec<&str> = index
            .slot_trips(Direction::Departure, 450)
            .map(|t| t.id())
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);

        let ids: Vec<&str> = index
            .slot_trips(Direction::Arrival, 465)
            .map(|t| t.id())
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_overnight_trip_lands_in_both_ends_of_day() {
        let index = TimeBucketIndex::build(three_trips());
        let dep: Vec<&str> = index.slot_trips(Direction::Departure, 1430).map(|t| t.id()).collect();
        let arr: Vec<&str> = index.slot_trips(Direction::Arrival, 10).map(|t| t.id()).collect();
        assert_eq!(dep, vec!["T2"]);
        assert_eq!(arr, vec!["T2"]);
    }
}
