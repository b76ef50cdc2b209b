//! Engine facade: the entry points a request-handling layer calls.
//!
//! Wraps the four decision components and applies their results to the
//! owned store through the capacity ledger, recording one audit entry per
//! mutating operation. Decision components stay pure; all mutation
//! happens here.

mod ops;
mod types;

pub use ops::StowageEngine;
pub use types::{
    ContainerSpec, ItemUpdate, ManifestItem, PlaceOutcome, PlaceRequest, ReturnManifest,
    WasteContainerSpec, DEFAULT_PRIORITY,
};
