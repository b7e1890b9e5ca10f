//! Time-windowed station traffic.
//!
//! Trips are bucketed once by departure and arrival minute. Each filter
//! change selects the slots of a circular window around the chosen minute,
//! counts departures and arrivals per station, and merges the counts onto
//! the station list together with the marker scales for that state.

pub mod buckets;
pub mod engine;
pub mod merge;
pub mod rollup;
pub mod scale;
pub mod window;

pub use buckets::TimeBucketIndex;
pub use engine::{TrafficEngine, TrafficSnapshot, compute_snapshot};
pub use merge::StationSnapshot;
pub use window::{CircularWindow, WindowRadius};
