//! Mappings from aggregate values to marker encodings.

use serde::Serialize;

use crate::time::TimeFilter;
use crate::traffic::merge::StationSnapshot;

/// Marker radius range when every trip is shown.
pub const UNFILTERED_RADIUS_RANGE: (f64, f64) = (0.0, 25.0);
/// Marker radius range inside a time window. The nonzero floor keeps quiet stations visible.
pub const FILTERED_RADIUS_RANGE: (f64, f64) = (3.0, 50.0);

/// Discrete flow styles: mostly arrivals, balanced, mostly departures.
pub const FLOW_BUCKETS: [f64; 3] = [0.0, 0.5, 1.0];

/// Square-root scale from `[0, max_traffic]` onto a radius range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusScale {
    max_traffic: usize,
    range: (f64, f64),
}

impl RadiusScale {
    pub fn new(max_traffic: usize, range: (f64, f64)) -> Self {
        RadiusScale { max_traffic, range }
    }

    /// Domain from the busiest station in `stations`, range picked by `filter`.
    pub fn for_snapshot(stations: &[StationSnapshot], filter: TimeFilter) -> Self {
        let max_traffic = stations.iter().map(|s| s.total_traffic).max().unwrap_or(0);
        let range = if filter.is_filtered() {
            FILTERED_RADIUS_RANGE
        } else {
            UNFILTERED_RADIUS_RANGE
        };
        RadiusScale::new(max_traffic, range)
    }

    pub fn max_traffic(&self) -> usize {
        self.max_traffic
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Radius for a station with `total_traffic` trips.
    ///
    /// A collapsed domain (`max_traffic == 0`) maps everything to the range minimum.
    pub fn radius(&self, total_traffic: usize) -> f64 {
        let (lo, hi) = self.range;
        if self.max_traffic == 0 {
            return lo;
        }
        let t = (total_traffic as f64).sqrt() / (self.max_traffic as f64).sqrt();
        lo + t * (hi - lo)
    }
}

/// Quantizes a flow ratio in `[0, 1]` into one of [`FLOW_BUCKETS`].
///
/// The domain is cut at `1/3` and `2/3`; a ratio equal to a threshold falls
/// into the upper bucket and values outside the domain clamp to the end
/// buckets. An undefined ratio has no bucket.
pub fn flow_bucket(flow_ratio: Option<f64>) -> Option<f64> {
    let ratio = flow_ratio.filter(|r| !r.is_nan())?;
    let n = FLOW_BUCKETS.len();
    let i = (1..n)
        .map(|k| k as f64 / n as f64)
        .filter(|threshold| ratio >= *threshold)
        .count();
    Some(FLOW_BUCKETS[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Station;
    use approx::assert_relative_eq;

    fn snapshot(total: usize) -> StationSnapshot {
        StationSnapshot::from_counts(&Station::new("S", 0.0, 0.0), total, 0)
    }

    #[test]
    fn test_radius_unfiltered_range() {
        let stations = vec![snapshot(0), snapshot(25), snapshot(100)];
        let scale = RadiusScale::for_snapshot(&stations, TimeFilter::Unfiltered);
        assert_eq!(scale.max_traffic(), 100);
        assert_relative_eq!(scale.radius(0), 0.0);
        assert_relative_eq!(scale.radius(25), 12.5);
        assert_relative_eq!(scale.radius(100), 25.0);
    }

    #[test]
    fn test_radius_filtered_range_has_floor() {
        let stations = vec![snapshot(4), snapshot(16)];
        let filter = TimeFilter::from_control(480).unwrap();
        let scale = RadiusScale::for_snapshot(&stations, filter);
        assert_eq!(scale.range(), FILTERED_RADIUS_RANGE);
        assert_relative_eq!(scale.radius(0), 3.0);
        assert_relative_eq!(scale.radius(4), 3.0 + 0.5 * 47.0);
        assert_relative_eq!(scale.radius(16), 50.0);
    }

    #[test]
    fn test_radius_collapsed_domain_returns_minimum() {
        let filtered = RadiusScale::for_snapshot(&[snapshot(0)], TimeFilter::from_control(0).unwrap());
        assert_relative_eq!(filtered.radius(0), 3.0);
        assert_relative_eq!(filtered.radius(10), 3.0);

        let empty = RadiusScale::for_snapshot(&[], TimeFilter::Unfiltered);
        assert_eq!(empty.max_traffic(), 0);
        assert_relative_eq!(empty.radius(5), 0.0);
    }

    #[test]
    fn test_flow_bucket_thresholds() {
        assert_eq!(flow_bucket(Some(0.0)), Some(0.0));
        assert_eq!(flow_bucket(Some(0.33)), Some(0.0));
        assert_eq!(flow_bucket(Some(0.34)), Some(0.5));
        assert_eq!(flow_bucket(Some(0.5)), Some(0.5));
        assert_eq!(flow_bucket(Some(0.66)), Some(0.5));
        assert_eq!(flow_bucket(Some(2.0 / 3.0)), Some(1.0));
        assert_eq!(flow_bucket(Some(0.67)), Some(1.0));
        assert_eq!(flow_bucket(Some(1.0)), Some(1.0));
    }

    #[test]
    fn test_flow_bucket_clamps_and_sentinel() {
        assert_eq!(flow_bucket(Some(-0.2)), Some(0.0));
        assert_eq!(flow_bucket(Some(1.7)), Some(1.0));
        assert_eq!(flow_bucket(None), None);
        assert_eq!(flow_bucket(Some(f64::NAN)), None);
    }
}
