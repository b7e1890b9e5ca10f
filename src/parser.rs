//! Decoders for the trip CSV and station JSON sources.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::LoadError;
use crate::model::{Station, Trip};

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A row of the trip CSV. Columns other than these are ignored.
#[derive(Debug, Deserialize)]
struct TripRecord {
    #[serde(default)]
    ride_id: String,
    start_station_id: Option<String>,
    end_station_id: Option<String>,
    started_at: String,
    ended_at: String,
}

#[derive(Debug, Deserialize)]
struct StationRecord {
    short_name: String,
    name: Option<String>,
    #[serde(deserialize_with = "number_or_string")]
    lat: f64,
    #[serde(deserialize_with = "number_or_string")]
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct StationData {
    stations: Vec<StationRecord>,
}

/// Either a GBFS-style `{"data": {"stations": [...]}}` document or a bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StationDocument {
    Feed { data: StationData },
    List(Vec<StationRecord>),
}

/// Parses a local wall-clock timestamp.
///
/// RFC 3339 values keep the wall-clock time of their own offset.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_local());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Decodes trips from CSV bytes with a header row.
///
/// Rows without a start or end station are skipped.
///
/// # Errors
///
/// Returns an error if a row cannot be read or a timestamp cannot be parsed.
pub fn parse_trips(bytes: &[u8]) -> Result<Vec<Trip>, LoadError> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let mut trips = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.deserialize() {
        let record: TripRecord = result?;

        let (Some(start), Some(end)) = (
            record.start_station_id.filter(|s| !s.is_empty()),
            record.end_station_id.filter(|s| !s.is_empty()),
        ) else {
            skipped += 1;
            continue;
        };

        let started_at = timestamp(&record.ride_id, &record.started_at)?;
        let ended_at = timestamp(&record.ride_id, &record.ended_at)?;
        trips.push(Trip::new(record.ride_id, start, end, started_at, ended_at));
    }

    debug!(trips = trips.len(), skipped, "Parsed trips");
    Ok(trips)
}

/// Decodes stations from JSON bytes.
///
/// # Errors
///
/// Returns an error if the bytes are neither a station feed nor a station list.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>, LoadError> {
    let records = match serde_json::from_slice::<StationDocument>(bytes)? {
        StationDocument::Feed { data } => data.stations,
        StationDocument::List(records) => records,
    };

    let stations: Vec<Station> = records
        .into_iter()
        .map(|r| Station {
            id: r.short_name.into(),
            name: r.name,
            lat: r.lat,
            lon: r.lon,
        })
        .collect();

    debug!(stations = stations.len(), "Parsed stations");
    Ok(stations)
}

fn timestamp(trip_id: &str, value: &str) -> Result<NaiveDateTime, LoadError> {
    parse_timestamp(value).ok_or_else(|| LoadError::Timestamp {
        trip_id: trip_id.to_string(),
        value: value.to_string(),
    })
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
