pub mod error;
pub mod fetch;
pub mod model;
pub mod output;
pub mod parser;
pub mod stats;
pub mod time;
pub mod traffic;
