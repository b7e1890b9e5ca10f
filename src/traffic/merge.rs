use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::model::{Station, StationId};

/// Traffic at one station for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSnapshot {
    pub id: StationId,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub arrivals: usize,
    pub departures: usize,
    pub total_traffic: usize,
    /// `departures / total_traffic`; `None` when the station saw no traffic.
    pub flow_ratio: Option<f64>,
}

impl StationSnapshot {
    pub fn from_counts(station: &Station, departures: usize, arrivals: usize) -> Self {
        let total_traffic = arrivals + departures;
        StationSnapshot {
            id: station.id.clone(),
            name: station.name.clone(),
            lat: station.lat,
            lon: station.lon,
            arrivals,
            departures,
            total_traffic,
            flow_ratio: flow_ratio(departures, total_traffic),
        }
    }
}

/// Tooltip text shown next to a station marker.
impl fmt::Display for StationSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trips ({} departures, {} arrivals)",
            self.total_traffic, self.departures, self.arrivals
        )
    }
}

pub fn flow_ratio(departures: usize, total_traffic: usize) -> Option<f64> {
    if total_traffic == 0 {
        None
    } else {
        Some(departures as f64 / total_traffic as f64)
    }
}

/// Joins per-station counts onto the base station list.
///
/// Stations missing from a count map get 0 for that direction. Counts for ids
/// that match no station are dropped. The output keeps the station order.
pub fn merge(
    stations: &[Station],
    departure_counts: &HashMap<&StationId, usize>,
    arrival_counts: &HashMap<&StationId, usize>,
) -> Vec<StationSnapshot> {
    stations
        .iter()
        .map(|station| {
            let departures = departure_counts.get(&station.id).copied().unwrap_or(0);
            let arrivals = arrival_counts.get(&station.id).copied().unwrap_or(0);
            StationSnapshot::from_counts(station, departures, arrivals)
        })
        .collect()
}
