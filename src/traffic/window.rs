use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::TrafficError;
use crate::model::{Direction, Trip};
use crate::time::{MINUTES_PER_DAY, MinuteOfDay};
use crate::traffic::buckets::TimeBucketIndex;

const DAY: u32 = MINUTES_PER_DAY as u32;

/// Half-width of the time window in minutes, within `1..=719`.
///
/// A radius of 0 or 720 makes both window ends coincide, which would select
/// nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub struct WindowRadius(u16);

impl WindowRadius {
    pub const DEFAULT_MINUTES: u16 = 60;

    pub fn new(minutes: u32) -> Result<Self, TrafficError> {
        if (1..DAY / 2).contains(&minutes) {
            Ok(WindowRadius(minutes as u16))
        } else {
            Err(TrafficError::RadiusOutOfRange(minutes))
        }
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl Default for WindowRadius {
    fn default() -> Self {
        WindowRadius(Self::DEFAULT_MINUTES)
    }
}

impl From<WindowRadius> for u32 {
    fn from(radius: WindowRadius) -> Self {
        radius.0.into()
    }
}

impl TryFrom<u32> for WindowRadius {
    type Error = TrafficError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        WindowRadius::new(value)
    }
}

/// A `2 * radius` minute window centered on a minute of day, wrapping at midnight.
///
/// The window is half-open: slots `[min, max)`, where
/// `min = (center - radius + 1440) % 1440` and `max = (center + radius) % 1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircularWindow {
    min_minute: u16,
    max_minute: u16,
}

impl CircularWindow {
    pub fn new(center: MinuteOfDay, radius: WindowRadius) -> Self {
        let center = u32::from(center.get());
        let radius = u32::from(radius.minutes());
        CircularWindow {
            min_minute: ((center + DAY - radius) % DAY) as u16,
            max_minute: ((center + radius) % DAY) as u16,
        }
    }

    /// First slot included in the window.
    pub fn min_minute(&self) -> u16 {
        self.min_minute
    }

    /// First slot after the window; excluded.
    pub fn max_minute(&self) -> u16 {
        self.max_minute
    }

    /// True when the window crosses midnight.
    pub fn wraps(&self) -> bool {
        self.min_minute > self.max_minute
    }

    /// Slot ranges covered by the window, in selection order.
    pub fn slot_ranges(&self) -> Vec<Range<usize>> {
        let min = self.min_minute as usize;
        let max = self.max_minute as usize;
        if self.wraps() {
            vec![min..DAY as usize, 0..max]
        } else {
            vec![min..max]
        }
    }

    pub fn contains(&self, minute: MinuteOfDay) -> bool {
        let m = minute.get();
        if self.wraps() {
            m >= self.min_minute || m < self.max_minute
        } else {
            (self.min_minute..self.max_minute).contains(&m)
        }
    }

    /// Concatenates the trips in the window's slots for one direction.
    ///
    /// Slots before midnight come first, then slots after it; within a slot
    /// trips keep their insertion order.
    pub fn select<'a>(&self, index: &'a TimeBucketIndex, direction: Direction) -> Vec<&'a Trip> {
        let slots = index.buckets(direction).slots();
        let trips = index.trips();
        self.slot_ranges()
            .into_iter()
            .flat_map(move |range| slots[range].iter())
            .flatten()
            .map(|&pos| &trips[pos])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{three_trips, trip};

    fn minute(m: u16) -> MinuteOfDay {
        MinuteOfDay::new(m).unwrap()
    }

    #[test]
    fn test_radius_bounds() {
        assert_eq!(WindowRadius::default().minutes(), 60);
        assert!(WindowRadius::new(1).is_ok());
        assert!(WindowRadius::new(719).is_ok());
        assert_eq!(WindowRadius::new(0), Err(TrafficError::RadiusOutOfRange(0)));
        assert_eq!(
            WindowRadius::new(720),
            Err(TrafficError::RadiusOutOfRange(720))
        );
    }

    #[test]
    fn test_window_without_wrap() {
        let w = CircularWindow::new(minute(600), WindowRadius::default());
        assert_eq!((w.min_minute(), w.max_minute()), (540, 660));
        assert!(!w.wraps());
        assert_eq!(w.slot_ranges(), vec![540..660]);
    }

    #[test]
    fn test_window_wraps_at_midnight() {
        let w = CircularWindow::new(MinuteOfDay::MIDNIGHT, WindowRadius::default());
        assert_eq!((w.min_minute(), w.max_minute()), (1380, 60));
        assert!(w.wraps());
        assert_eq!(w.slot_ranges(), vec![1380..1440, 0..60]);

        for m in (1380..1440).chain(0..60) {
            assert!(w.contains(minute(m)), "minute {m} should be in window");
        }
        assert!(!w.contains(minute(60)));
        assert!(!w.contains(minute(1379)));
    }

    #[test]
    fn test_window_wraps_near_end_of_day() {
        let w = CircularWindow::new(minute(1400), WindowRadius::default());
        assert_eq!(w.slot_ranges(), vec![1340..1440, 0..20]);
    }

    #[test]
    fn test_max_boundary_excluded_min_included() {
        let trips = vec![
            trip("at_min", "A", (9, 0), "B", (9, 5)),
            trip("at_max", "A", (11, 0), "B", (11, 5)),
            trip("inside", "A", (10, 59), "B", (11, 5)),
        ];
        let index = TimeBucketIndex::build(trips);
        let w = CircularWindow::new(minute(600), WindowRadius::default());

        let ids: Vec<&str> = w
            .select(&index, Direction::Departure)
            .iter()
            .map(|t| t.id())
            .collect();
        assert_eq!(ids, vec!["at_min", "inside"]);
    }

    #[test]
    fn test_select_wrapped_orders_before_midnight_first() {
        let trips = vec![
            trip("early", "A", (0, 30), "B", (0, 45)),
            trip("late", "A", (23, 30), "B", (23, 45)),
        ];
        let index = TimeBucketIndex::build(trips);
        let w = CircularWindow::new(MinuteOfDay::MIDNIGHT, WindowRadius::default());

        let ids: Vec<&str> = w
            .select(&index, Direction::Departure)
            .iter()
            .map(|t| t.id())
            .collect();
        assert_eq!(ids, vec!["late", "early"]);
    }

    #[test]
    fn test_select_matches_contains_for_every_trip() {
        let index = TimeBucketIndex::build(three_trips());
        for center in [0u16, 60, 485, 720, 1430] {
            let w = CircularWindow::new(minute(center), WindowRadius::default());
            for direction in [Direction::Departure, Direction::Arrival] {
                let selected = w.select(&index, direction);
                let expected: Vec<&Trip> = index
                    .trips()
                    .iter()
                    .filter(|t| w.contains(direction.minute_of(t)))
                    .collect();
                assert_eq!(selected.len(), expected.len());
                for t in expected {
                    assert!(selected.iter().any(|s| std::ptr::eq(*s, t)));
                }
            }
        }
    }

    #[test]
    fn test_select_midnight_picks_only_overnight_trip() {
        let index = TimeBucketIndex::build(three_trips());
        let w = CircularWindow::new(MinuteOfDay::MIDNIGHT, WindowRadius::default());

        let dep: Vec<&str> = w.select(&index, Direction::Departure).iter().map(|t| t.id()).collect();
        let arr: Vec<&str> = w.select(&index, Direction::Arrival).iter().map(|t| t.id()).collect();
        assert_eq!(dep, vec!["T2"]);
        assert_eq!(arr, vec!["T2"]);
    }
}
