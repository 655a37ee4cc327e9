pub mod config;
pub mod error;
pub mod intake;
pub mod reports;
pub mod telemetry;
