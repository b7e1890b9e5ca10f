use serde::Serialize;
use tracing::{debug, warn};

use crate::error::TrafficError;
use crate::model::{Direction, Station, Trip};
use crate::time::TimeFilter;
use crate::traffic::buckets::TimeBucketIndex;
use crate::traffic::merge::{StationSnapshot, merge};
use crate::traffic::rollup::station_counts;
use crate::traffic::scale::{RadiusScale, flow_bucket};
use crate::traffic::window::{CircularWindow, WindowRadius};

/// Derived station traffic for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficSnapshot {
    pub filter: TimeFilter,
    pub radius: WindowRadius,
    /// Trips selected by departure time.
    pub departures: usize,
    /// Trips selected by arrival time.
    pub arrivals: usize,
    pub stations: Vec<StationSnapshot>,
    pub radius_scale: RadiusScale,
}

impl TrafficSnapshot {
    /// Snapshot before anything was computed.
    pub fn empty() -> Self {
        TrafficSnapshot {
            filter: TimeFilter::Unfiltered,
            radius: WindowRadius::default(),
            departures: 0,
            arrivals: 0,
            stations: Vec::new(),
            radius_scale: RadiusScale::for_snapshot(&[], TimeFilter::Unfiltered),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Marker radius for a station of this snapshot.
    pub fn marker_radius(&self, station: &StationSnapshot) -> f64 {
        self.radius_scale.radius(station.total_traffic)
    }

    /// Flow style bucket for a station of this snapshot.
    pub fn marker_flow(&self, station: &StationSnapshot) -> Option<f64> {
        flow_bucket(station.flow_ratio)
    }
}

/// Runs the per-filter pipeline: select, roll up both directions, merge, calibrate.
///
/// `Unfiltered` skips the window entirely and counts every trip.
pub fn compute_snapshot(
    index: &TimeBucketIndex,
    stations: &[Station],
    filter: TimeFilter,
    radius: WindowRadius,
) -> TrafficSnapshot {
    let (departing, arriving): (Vec<&Trip>, Vec<&Trip>) = match filter {
        TimeFilter::Unfiltered => (index.trips().iter().collect(), index.trips().iter().collect()),
        TimeFilter::Minute(center) => {
            let window = CircularWindow::new(center, radius);
            debug!(
                min_minute = window.min_minute(),
                max_minute = window.max_minute(),
                wraps = window.wraps(),
                "Selecting trips in window"
            );
            (
                window.select(index, Direction::Departure),
                window.select(index, Direction::Arrival),
            )
        }
    };

    let departure_counts = station_counts(departing.iter().copied(), Direction::Departure);
    let arrival_counts = station_counts(arriving.iter().copied(), Direction::Arrival);
    let stations = merge(stations, &departure_counts, &arrival_counts);
    let radius_scale = RadiusScale::for_snapshot(&stations, filter);

    TrafficSnapshot {
        filter,
        radius,
        departures: departing.len(),
        arrivals: arriving.len(),
        stations,
        radius_scale,
    }
}

/// Holds the base data and the last computed snapshot.
///
/// The index is built once in [`TrafficEngine::new`]; every filter change
/// recomputes a fresh snapshot from it.
#[derive(Debug)]
pub struct TrafficEngine {
    stations: Vec<Station>,
    index: TimeBucketIndex,
    radius: WindowRadius,
    snapshot: TrafficSnapshot,
}

impl TrafficEngine {
    pub fn new(stations: Vec<Station>, trips: Vec<Trip>, radius: WindowRadius) -> Self {
        let index = TimeBucketIndex::build(trips);
        debug!(
            stations = stations.len(),
            trips = index.trips().len(),
            "Built time bucket index"
        );
        TrafficEngine {
            stations,
            index,
            radius,
            snapshot: TrafficSnapshot::empty(),
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn index(&self) -> &TimeBucketIndex {
        &self.index
    }

    pub fn radius(&self) -> WindowRadius {
        self.radius
    }

    /// The last snapshot produced by [`TrafficEngine::apply`].
    pub fn snapshot(&self) -> &TrafficSnapshot {
        &self.snapshot
    }

    /// Computes the snapshot for `filter` without retaining it.
    pub fn compute(&self, filter: TimeFilter) -> TrafficSnapshot {
        compute_snapshot(&self.index, &self.stations, filter, self.radius)
    }

    /// Recomputes and retains the snapshot for `filter`.
    ///
    /// With no trips loaded, the previous snapshot is kept and
    /// [`TrafficError::NoTrips`] is returned.
    pub fn apply(&mut self, filter: TimeFilter) -> Result<&TrafficSnapshot, TrafficError> {
        if self.index.is_empty() {
            warn!(filter = %filter, "No trips data available for filtering");
            return Err(TrafficError::NoTrips);
        }
        debug!(filter = filter.to_control(), "Filtering trips");
        self.snapshot = self.compute(filter);
        Ok(&self.snapshot)
    }
}
