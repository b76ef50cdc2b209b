//! Rearrangement plan representation.

use serde::{Deserialize, Serialize};

/// One proposed relocation: take an item out of `from` and stow it in `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub item_id: String,
    pub item_name: String,
    pub from_container: String,
    pub to_container: String,

    /// Volume freed in `from_container` by this move.
    pub volume_freed: f64,

    /// Weight freed in `from_container` by this move.
    pub weight_freed: f64,
}

/// An ordered sequence of proposed moves intended to free capacity for a
/// pending placement.
///
/// This is a proposal, not an executed mutation; the engine applies it
/// through a separate transactional execution step. The freed totals are
/// cumulative across all source containers — the freed space may be
/// scattered, so callers re-run placement after execution rather than
/// assuming the pending item now fits anywhere in particular.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RearrangementPlan {
    pub moves: Vec<Move>,

    /// Total volume the plan frees across its source containers.
    pub freed_volume: f64,

    /// Total weight the plan frees across its source containers.
    pub freed_weight: f64,
}

impl RearrangementPlan {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the cumulative freed totals meet or exceed the given
    /// footprint. The engine only proposes covering plans.
    pub fn covers(&self, volume: f64, weight: f64) -> bool {
        self.freed_volume >= volume && self.freed_weight >= weight
    }
}
