use station_traffic::parser::{parse_stations, parse_trips};
use station_traffic::stats::FilterSummary;
use station_traffic::time::TimeFilter;
use station_traffic::traffic::{StationSnapshot, TrafficEngine, TrafficSnapshot, WindowRadius};

fn engine() -> TrafficEngine {
    let stations = parse_stations(include_bytes!("fixtures/stations.json")).expect("stations");
    let trips = parse_trips(include_bytes!("fixtures/trips.csv")).expect("trips");
    TrafficEngine::new(stations, trips, WindowRadius::default())
}

fn station<'a>(snapshot: &'a TrafficSnapshot, id: &str) -> &'a StationSnapshot {
    snapshot
        .stations
        .iter()
        .find(|s| s.id.as_str() == id)
        .expect("station in snapshot")
}

#[test]
fn test_fixture_loads() {
    let engine = engine();
    assert_eq!(engine.stations().len(), 4);
    // T5 has no start station and is skipped
    assert_eq!(engine.index().trips().len(), 4);
}

#[test]
fn test_midnight_window_selects_only_overnight_trip() {
    let mut engine = engine();
    let snapshot = engine.apply("0".parse().unwrap()).unwrap();

    assert_eq!(snapshot.departures, 1);
    assert_eq!(snapshot.arrivals, 1);
    assert_eq!(station(snapshot, "A").departures, 1);
    assert_eq!(station(snapshot, "A").arrivals, 0);
    assert_eq!(station(snapshot, "C").arrivals, 1);
    assert_eq!(station(snapshot, "B").total_traffic, 0);
    assert_eq!(station(snapshot, "B").flow_ratio, None);
}

#[test]
fn test_unfiltered_counts_all_trips() {
    let mut engine = engine();
    let snapshot = engine.apply(TimeFilter::Unfiltered).unwrap();

    let a = station(snapshot, "A");
    assert_eq!((a.departures, a.arrivals), (2, 2));
    assert_eq!(a.total_traffic, 4);
    let b = station(snapshot, "B");
    assert_eq!((b.departures, b.arrivals), (1, 1));
    let c = station(snapshot, "C");
    assert_eq!((c.departures, c.arrivals), (0, 1));
    let d = station(snapshot, "D");
    assert_eq!(d.total_traffic, 0);

    // X99 departs in the trip data but is not a listed station
    assert_eq!(snapshot.stations.len(), 4);
    assert!(snapshot.stations.iter().all(|s| s.id.as_str() != "X99"));
}

#[test]
fn test_same_filter_yields_same_snapshot() {
    let engine = engine();
    let filter: TimeFilter = "12:10".parse().unwrap();
    assert_eq!(engine.compute(filter), engine.compute(filter));

    let summary = FilterSummary::from_snapshot(&engine.compute(filter));
    assert_eq!(summary.label, "12:10 PM");
    assert_eq!(summary.departures, 1);
    assert_eq!(summary.arrivals, 1);
    assert_eq!(summary.busiest_station.as_deref(), Some("A"));
}
