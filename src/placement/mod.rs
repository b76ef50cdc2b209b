//! Placement scoring: pick the best storage container for a new item.
//!
//! Eligibility is a hard volume/weight filter; eligible containers are
//! ranked by a weighted combination of tight fit and accessibility, and the
//! single maximum wins. Returns nothing when no container is eligible —
//! that is a valid outcome the caller answers with a rearrangement plan,
//! not an error.

mod config;
mod scorer;

pub use config::PlacementConfig;
pub use scorer::{score_container, select_container, CandidateScore, PlacementQuery};
