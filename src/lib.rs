//! Spacecraft cargo stowage engine.
//!
//! Manages finite storage capacity aboard a vehicle: where items are
//! placed among containers, how they are retrieved, how space is reclaimed
//! through rearrangement, and how waste is routed and eventually
//! jettisoned.
//!
//! - **Placement** ([`placement`]): weighted tight-fit/accessibility
//!   scoring that picks a container for a new item, or signals that none
//!   is available.
//! - **Retrieval** ([`retrieval`]): per-item access-time estimation
//!   producing a fastest-first ranking with expiry outlook.
//! - **Rearrangement** ([`rearrange`]): bounded greedy move search that
//!   frees capacity for an item that does not currently fit.
//! - **Waste routing** ([`waste`]): disposal container selection by
//!   category and remaining capacity.
//! - **Store & ledger** ([`store`]): the inventory data model and the
//!   shared capacity bookkeeping every mutation goes through.
//! - **Engine** ([`engine`]): the facade that applies decisions to the
//!   store and exposes the operation entry points.
//!
//! # Architecture
//!
//! The decision components are pure functions over an immutable snapshot:
//! no I/O, no clocks, no hidden globals. The [`engine::StowageEngine`]
//! owns the store for a request cycle and is the only place mutation
//! happens; callers load a snapshot ([`persist`]), run operations with an
//! explicit `now`, and take the store back to persist it. Audit logging
//! ([`audit`]) and statistics ([`stats`]) hang off that same cycle.
//!
//! The heuristics are deliberately greedy, not optimal: placement extracts
//! a single maximum, rearrangement accumulates largest-volume-first moves
//! until the pending footprint is covered.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use stowage::engine::{PlaceRequest, PlaceOutcome, StowageEngine};
//! use stowage::persist;
//!
//! let now = Utc::now();
//! let mut engine = StowageEngine::new(persist::sample_store(now));
//!
//! let outcome = engine
//!     .place(PlaceRequest::new("item_100", "Camera", 1.2, 0.8).with_priority(4), now)
//!     .unwrap();
//! assert!(matches!(outcome, PlaceOutcome::Placed { .. }));
//!
//! let results = engine.search("camera", None, now);
//! assert_eq!(results[0].item_id, "item_100");
//! ```

pub mod audit;
pub mod engine;
pub mod error;
pub mod persist;
pub mod placement;
pub mod rearrange;
pub mod retrieval;
pub mod stats;
pub mod store;
pub mod waste;
