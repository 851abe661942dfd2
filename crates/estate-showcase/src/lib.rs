pub mod config;
pub mod error;
pub mod imagery;
pub mod listings;
pub mod telemetry;
pub mod transactions;
