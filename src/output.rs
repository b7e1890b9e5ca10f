//! Output formatting and persistence for traffic snapshots.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::traffic::TrafficSnapshot;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// A station row as handed to the renderer: counts plus marker encodings.
#[derive(Debug, Serialize)]
pub struct StationRecord<'a> {
    pub time_filter: i64,
    pub station_id: &'a str,
    pub name: Option<&'a str>,
    pub lat: f64,
    pub lon: f64,
    pub departures: usize,
    pub arrivals: usize,
    pub total_traffic: usize,
    pub flow_ratio: Option<f64>,
    pub radius: f64,
    pub flow_bucket: Option<f64>,
    pub title: String,
}

/// Flattens a snapshot into one record per station, in station order.
pub fn station_records(snapshot: &TrafficSnapshot) -> Vec<StationRecord<'_>> {
    snapshot
        .stations
        .iter()
        .map(|s| StationRecord {
            time_filter: snapshot.filter.to_control(),
            station_id: s.id.as_str(),
            name: s.name.as_deref(),
            lat: s.lat,
            lon: s.lon,
            departures: s.departures,
            arrivals: s.arrivals,
            total_traffic: s.total_traffic,
            flow_ratio: s.flow_ratio,
            radius: snapshot.marker_radius(s),
            flow_bucket: snapshot.marker_flow(s),
            title: s.to_string(),
        })
        .collect()
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a serializable record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &impl Serialize) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

/// Writes every station of a snapshot to a fresh CSV file.
pub fn write_snapshot_csv(path: &str, snapshot: &TrafficSnapshot) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    let records = station_records(snapshot);
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path, rows = records.len(), "Snapshot written");
    Ok(())
}
