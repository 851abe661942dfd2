//! Simulated purchase flow. Hashes are fabricated locally; no chain is contacted.

pub mod details;
pub mod simulator;

pub use details::TransactionDetails;
pub use simulator::{
    truncate_hash, SimulationTiming, TransactionError, TransactionHash, TransactionLog,
    TransactionReceipt, TransactionSession,
};
