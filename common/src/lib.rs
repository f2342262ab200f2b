//! Shared models, configuration and seams used by every adminsweep crate.

pub mod config;
pub mod error;
pub mod executor;
pub mod network;
pub mod outcome;
pub mod reporter;

pub use error::SweepError;
