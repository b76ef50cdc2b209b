//! Rearrangement planning: free space for an item that does not fit.
//!
//! A bounded greedy search over candidate relocations, largest volume
//! first. Plans are proposals; the engine executes them in a separate
//! all-or-nothing step. Enumeration is O(containers² × items-per-container)
//! and runs to completion — container counts are expected in the tens.

mod planner;
mod types;

pub use planner::plan_rearrangement;
pub use types::{Move, RearrangementPlan};
