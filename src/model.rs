//! Base records: stations and trips, loaded once and read-only afterwards.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::time::MinuteOfDay;

/// Station identifier shared by station records and trip endpoints.
///
/// Backed by `Arc<str>` so per-filter snapshots clone it cheaply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(Arc<str>);

impl StationId {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(StationId::from)
    }
}

impl From<&str> for StationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StationId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

/// A bike-share station. `id` is the source's `short_name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub id: StationId,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl Station {
    pub fn new(id: impl Into<StationId>, lat: f64, lon: f64) -> Self {
        Station {
            id: id.into(),
            name: None,
            lat,
            lon,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

/// A single trip. Start and end minutes are derived once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    id: String,
    start_station_id: StationId,
    end_station_id: StationId,
    started_at: NaiveDateTime,
    ended_at: NaiveDateTime,
    start_minute: MinuteOfDay,
    end_minute: MinuteOfDay,
}

impl Trip {
    pub fn new(
        id: impl Into<String>,
        start_station_id: impl Into<StationId>,
        end_station_id: impl Into<StationId>,
        started_at: NaiveDateTime,
        ended_at: NaiveDateTime,
    ) -> Self {
        Trip {
            id: id.into(),
            start_station_id: start_station_id.into(),
            end_station_id: end_station_id.into(),
            started_at,
            ended_at,
            start_minute: MinuteOfDay::from_time(&started_at),
            end_minute: MinuteOfDay::from_time(&ended_at),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start_station_id(&self) -> &StationId {
        &self.start_station_id
    }

    pub fn end_station_id(&self) -> &StationId {
        &self.end_station_id
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    pub fn ended_at(&self) -> NaiveDateTime {
        self.ended_at
    }

    pub fn start_minute(&self) -> MinuteOfDay {
        self.start_minute
    }

    pub fn end_minute(&self) -> MinuteOfDay {
        self.end_minute
    }
}

/// Which end of a trip a count refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Departure,
    Arrival,
}

impl Direction {
    /// Station the trip leaves from (departures) or arrives at (arrivals).
    pub fn station_of(self, trip: &Trip) -> &StationId {
        match self {
            Direction::Departure => trip.start_station_id(),
            Direction::Arrival => trip.end_station_id(),
        }
    }

    /// Minute of day at which the trip leaves (departures) or arrives (arrivals).
    pub fn minute_of(self, trip: &Trip) -> MinuteOfDay {
        match self {
            Direction::Departure => trip.start_minute(),
            Direction::Arrival => trip.end_minute(),
        }
    }
}
