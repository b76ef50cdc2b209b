//! Retrieval estimation: rank candidate items by estimated access cost.
//!
//! Container accessibility contributes a fixed band of minutes; depth of
//! burial, approximated by insertion order, contributes another. Results
//! also carry an expiry outlook so searches surface items that should be
//! used first. Strictly read-only.

mod config;
mod estimator;

pub use config::RetrievalConfig;
pub use estimator::{estimate_and_rank, RetrievalEstimate};
