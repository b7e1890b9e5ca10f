use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::traffic::TrafficSnapshot;

/// One row per filter event, suitable for appending to a CSV log.
#[derive(Debug, Default, Serialize)]
pub struct FilterSummary {
    pub timestamp: DateTime<Utc>,
    /// `-1` for any time, otherwise the minute of day.
    pub time_filter: i64,
    pub label: String,
    pub radius_minutes: u16,

    // trips selected by the window
    pub departures: usize,
    pub arrivals: usize,

    // stations
    pub stations: usize,
    pub active_stations: usize,
    pub active_pct: f64,
    pub busiest_station: Option<String>,
    pub busiest_traffic: usize,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl FilterSummary {
    pub fn from_snapshot(snapshot: &TrafficSnapshot) -> Self {
        let active_stations = snapshot
            .stations
            .iter()
            .filter(|s| s.total_traffic > 0)
            .count();

        // max_by_key keeps the last maximum; reversing makes the first station win ties
        let busiest = snapshot
            .stations
            .iter()
            .rev()
            .filter(|s| s.total_traffic > 0)
            .max_by_key(|s| s.total_traffic);

        FilterSummary {
            timestamp: Utc::now(),
            time_filter: snapshot.filter.to_control(),
            label: snapshot.filter.to_string(),
            radius_minutes: snapshot.radius.minutes(),
            departures: snapshot.departures,
            arrivals: snapshot.arrivals,
            stations: snapshot.stations.len(),
            active_stations,
            active_pct: Self::pct(active_stations, snapshot.stations.len()),
            busiest_station: busiest.map(|s| s.id.to_string()),
            busiest_traffic: busiest.map_or(0, |s| s.total_traffic),
            error_type: None,
            error_message: None,
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        FilterSummary {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    /// Set the filter the failed event asked for
    pub fn with_filter(mut self, time_filter: i64, label: &str) -> Self {
        self.time_filter = time_filter;
        self.label = label.to_string();
        self
    }
}
