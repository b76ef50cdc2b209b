//! Capacity bookkeeping shared by storage and waste containers.

use crate::error::StowageError;
use serde::{Deserialize, Serialize};

/// Tolerance for floating-point capacity comparisons.
pub const CAPACITY_EPSILON: f64 = 1e-9;

/// Volume and weight bookkeeping for a container.
///
/// The used/current fields are maintained redundantly so eligibility checks
/// are O(1); every mutation goes through [`charge`](Capacity::charge) /
/// [`release`](Capacity::release) to keep them consistent with the member
/// items. Invariant: `0 <= used_volume <= total_volume` and
/// `0 <= current_weight <= max_weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    /// Total volume the container can hold.
    pub total_volume: f64,

    /// Volume currently occupied by member items.
    pub used_volume: f64,

    /// Maximum weight the container can carry.
    pub max_weight: f64,

    /// Weight currently carried.
    pub current_weight: f64,
}

impl Capacity {
    /// Creates an empty capacity with the given limits.
    pub fn new(total_volume: f64, max_weight: f64) -> Self {
        Self {
            total_volume,
            used_volume: 0.0,
            max_weight,
            current_weight: 0.0,
        }
    }

    /// Remaining volume.
    pub fn free_volume(&self) -> f64 {
        self.total_volume - self.used_volume
    }

    /// Remaining weight allowance.
    pub fn free_weight(&self) -> f64 {
        self.max_weight - self.current_weight
    }

    /// Whether an item of the given footprint fits without violating
    /// either limit.
    pub fn can_hold(&self, volume: f64, weight: f64) -> bool {
        self.used_volume + volume <= self.total_volume + CAPACITY_EPSILON
            && self.current_weight + weight <= self.max_weight + CAPACITY_EPSILON
    }

    /// Applies a positive volume/weight delta, rejecting it if either
    /// limit would be exceeded.
    ///
    /// `container` is only used to label the error.
    pub fn charge(&mut self, container: &str, volume: f64, weight: f64) -> Result<(), StowageError> {
        if !self.can_hold(volume, weight) {
            return Err(StowageError::CapacityExceeded {
                container: container.to_string(),
                needed_volume: volume,
                needed_weight: weight,
                free_volume: self.free_volume(),
                free_weight: self.free_weight(),
            });
        }
        self.used_volume += volume;
        self.current_weight += weight;
        Ok(())
    }

    /// Reverses a previous charge. Clamps at zero so rounding noise can
    /// never push the gauges negative.
    pub fn release(&mut self, volume: f64, weight: f64) {
        self.used_volume = (self.used_volume - volume).max(0.0);
        self.current_weight = (self.current_weight - weight).max(0.0);
    }

    /// Volume utilization in percent (0 when the limit is zero).
    pub fn volume_utilization(&self) -> f64 {
        if self.total_volume > 0.0 {
            self.used_volume / self.total_volume * 100.0
        } else {
            0.0
        }
    }

    /// Weight utilization in percent (0 when the limit is zero).
    pub fn weight_utilization(&self) -> f64 {
        if self.max_weight > 0.0 {
            self.current_weight / self.max_weight * 100.0
        } else {
            0.0
        }
    }

    /// Checks the capacity invariant.
    pub fn check(&self, container: &str) -> Result<(), StowageError> {
        if self.used_volume < -CAPACITY_EPSILON
            || self.used_volume > self.total_volume + CAPACITY_EPSILON
        {
            return Err(StowageError::Inconsistent(format!(
                "{container}: used_volume {} outside [0, {}]",
                self.used_volume, self.total_volume
            )));
        }
        if self.current_weight < -CAPACITY_EPSILON
            || self.current_weight > self.max_weight + CAPACITY_EPSILON
        {
            return Err(StowageError::Inconsistent(format!(
                "{container}: current_weight {} outside [0, {}]",
                self.current_weight, self.max_weight
            )));
        }
        Ok(())
    }
}
