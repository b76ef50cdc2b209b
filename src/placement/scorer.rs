//! Best-fit container selection for incoming items.

use super::config::PlacementConfig;
use crate::store::{ContainerKind, StorageContainer};

/// The footprint of an item being placed: everything the scorer needs to
/// know about it.
#[derive(Debug, Clone, Copy)]
pub struct PlacementQuery {
    pub volume: f64,
    pub weight: f64,
    /// Urgency 1–5.
    pub priority: u8,
}

impl PlacementQuery {
    pub fn new(volume: f64, weight: f64, priority: u8) -> Self {
        Self {
            volume,
            weight,
            priority,
        }
    }
}

/// Per-factor score breakdown for one eligible container.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub container_id: String,

    /// Tight-fit factor: how much of the container's remaining slack the
    /// item consumes, normalized by total volume. Higher = tighter fit.
    pub space_efficiency: f64,

    /// Accessibility factor scaled by the item's priority; low-priority
    /// items are indifferent to accessibility.
    pub accessibility: f64,

    /// Weighted combination of the two factors.
    pub total: f64,
}

/// Scores a single container against the query.
///
/// Returns `None` when the container is ineligible: not a storage
/// container, or the item would violate its volume or weight limits.
/// Ineligible containers are excluded entirely, never penalized.
pub fn score_container(
    query: &PlacementQuery,
    container: &StorageContainer,
    config: &PlacementConfig,
) -> Option<CandidateScore> {
    if container.kind != ContainerKind::Storage {
        return None;
    }
    if !container.capacity.can_hold(query.volume, query.weight) {
        return None;
    }

    let remaining = container.capacity.free_volume();
    let space_efficiency = 1.0 - (remaining - query.volume) / container.capacity.total_volume;
    let accessibility = container.accessibility_factor * (f64::from(query.priority) / 5.0);
    let total =
        config.space_weight * space_efficiency + config.accessibility_weight * accessibility;

    Some(CandidateScore {
        container_id: container.id.clone(),
        space_efficiency,
        accessibility,
        total,
    })
}

/// Picks the best container for the query, or `None` when nothing is
/// eligible (the caller then falls back to the rearrangement planner).
///
/// A plain linear scan tracking the current maximum; only the top element
/// is ever consumed, so no priority queue is needed. Containers must be
/// supplied in ascending id order (as [`InventoryStore::storage_containers`]
/// yields them) for ties to resolve to the lowest id.
///
/// Pure function over the supplied snapshot; no side effects.
///
/// [`InventoryStore::storage_containers`]: crate::store::InventoryStore::storage_containers
pub fn select_container<'a>(
    query: &PlacementQuery,
    containers: impl IntoIterator<Item = &'a StorageContainer>,
    config: &PlacementConfig,
) -> Option<String> {
    let mut best: Option<CandidateScore> = None;
    for container in containers {
        let Some(score) = score_container(query, container, config) else {
            continue;
        };
        // Strict improvement keeps the earliest (lowest-id) winner on ties
        match &best {
            Some(current) if score.total <= current.total => {}
            _ => best = Some(score),
        }
    }
    best.map(|s| s.container_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Capacity;

    fn container(
        id: &str,
        total_volume: f64,
        used_volume: f64,
        accessibility: f64,
    ) -> StorageContainer {
        let mut capacity = Capacity::new(total_volume, 1000.0);
        capacity.charge(id, used_volume, 0.0).unwrap();
        StorageContainer {
            id: id.into(),
            name: id.to_uppercase(),
            capacity,
            items: Vec::new(),
            kind: ContainerKind::Storage,
            accessibility_factor: accessibility,
        }
    }

    #[test]
    fn test_ineligible_by_volume() {
        let c = container("a", 10.0, 9.0, 0.5);
        let query = PlacementQuery::new(2.0, 0.1, 3);
        assert!(score_container(&query, &c, &PlacementConfig::default()).is_none());
    }

    #[test]
    fn test_ineligible_by_weight() {
        let mut c = container("a", 10.0, 0.0, 0.5);
        c.capacity.max_weight = 1.0;
        let query = PlacementQuery::new(1.0, 2.0, 3);
        assert!(score_container(&query, &c, &PlacementConfig::default()).is_none());
    }

    #[test]
    fn test_non_storage_excluded() {
        let mut c = container("a", 10.0, 0.0, 0.5);
        c.kind = ContainerKind::Return;
        let query = PlacementQuery::new(1.0, 0.1, 3);
        assert!(score_container(&query, &c, &PlacementConfig::default()).is_none());
    }

    #[test]
    fn test_space_efficiency_formula() {
        // total=100, used=90, item=8: remaining=10, eff = 1 - (10-8)/100 = 0.98
        let c = container("a", 100.0, 90.0, 0.0);
        let query = PlacementQuery::new(8.0, 0.1, 1);
        let score = score_container(&query, &c, &PlacementConfig::default()).unwrap();
        assert!((score.space_efficiency - 0.98).abs() < 1e-10);
    }

    #[test]
    fn test_accessibility_scales_with_priority() {
        let c = container("a", 100.0, 0.0, 0.8);
        let config = PlacementConfig::default();
        let low = score_container(&PlacementQuery::new(1.0, 0.1, 1), &c, &config).unwrap();
        let high = score_container(&PlacementQuery::new(1.0, 0.1, 5), &c, &config).unwrap();
        assert!((low.accessibility - 0.8 / 5.0).abs() < 1e-10);
        assert!((high.accessibility - 0.8).abs() < 1e-10);
    }

    #[test]
    fn test_tight_fit_and_accessibility_dominate() {
        // X is nearly full and easy to reach, Y is empty and
        // awkward. A high-priority item that fits both should land in X.
        let x = container("x", 100.0, 90.0, 0.9);
        let y = container("y", 100.0, 10.0, 0.2);
        let query = PlacementQuery::new(8.0, 1.0, 5);
        let config = PlacementConfig::default();

        let sx = score_container(&query, &x, &config).unwrap();
        let sy = score_container(&query, &y, &config).unwrap();
        assert!(sx.space_efficiency > sy.space_efficiency);

        let winner = select_container(&query, [&y, &x], &config);
        assert_eq!(winner.as_deref(), Some("x"));
    }

    #[test]
    fn test_empty_set_returns_none() {
        let query = PlacementQuery::new(1.0, 1.0, 3);
        assert!(select_container(&query, [], &PlacementConfig::default()).is_none());
    }

    #[test]
    fn test_all_ineligible_returns_none() {
        let a = container("a", 5.0, 4.9, 0.5);
        let b = container("b", 5.0, 4.8, 0.5);
        let query = PlacementQuery::new(1.0, 0.1, 3);
        assert!(select_container(&query, [&a, &b], &PlacementConfig::default()).is_none());
    }

    #[test]
    fn test_tie_breaks_to_lowest_id() {
        // Identical geometry, identical accessibility: exact score tie.
        let a = container("a", 10.0, 0.0, 0.5);
        let b = container("b", 10.0, 0.0, 0.5);
        let query = PlacementQuery::new(1.0, 0.1, 3);
        let winner = select_container(&query, [&a, &b], &PlacementConfig::default());
        assert_eq!(winner.as_deref(), Some("a"));
    }

    #[test]
    fn test_never_selects_overfull() {
        // The winner must actually hold the item.
        let a = container("a", 10.0, 9.5, 0.9);
        let b = container("b", 10.0, 2.0, 0.1);
        let query = PlacementQuery::new(1.0, 0.1, 5);
        let winner = select_container(&query, [&a, &b], &PlacementConfig::default()).unwrap();
        assert_eq!(winner, "b");
    }
}
