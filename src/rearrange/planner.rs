//! Greedy move search for freeing storage capacity.

use super::types::{Move, RearrangementPlan};
use std::collections::{BTreeMap, BTreeSet};

use crate::store::InventoryStore;

/// Searches for a sequence of moves that frees capacity for an item of the
/// given footprint.
///
/// Invoked when the placement scorer found no eligible container. Candidate
/// moves are every (item, source, destination) triple where the destination
/// is a different storage container that can absorb the item. Candidates
/// are taken greedily, largest volume first, until the cumulative freed
/// totals cover the footprint or the candidates run out — in which case a
/// partial plan is returned and [`RearrangementPlan::covers`] reports the
/// shortfall.
///
/// Accepted moves are feasibility-checked as the plan grows: an item is
/// planned at most once, and each destination's remaining capacity is
/// tracked across prior accepted moves, so a returned plan always executes
/// cleanly against the snapshot it was planned on.
///
/// Pure function over the snapshot; the store is not mutated.
pub fn plan_rearrangement(volume: f64, weight: f64, store: &InventoryStore) -> RearrangementPlan {
    let mut candidates: Vec<Move> = Vec::new();

    for container in store.storage_containers() {
        for item_id in &container.items {
            let Some(item) = store.items.get(item_id) else {
                continue;
            };
            for other in store.storage_containers() {
                if other.id == container.id {
                    continue;
                }
                if !other.capacity.can_hold(item.volume, item.weight) {
                    continue;
                }
                candidates.push(Move {
                    item_id: item.id.clone(),
                    item_name: item.name.clone(),
                    from_container: container.id.clone(),
                    to_container: other.id.clone(),
                    volume_freed: item.volume,
                    weight_freed: item.weight,
                });
            }
        }
    }

    // Largest-first greedy; stable sort keeps enumeration order on ties
    candidates.sort_by(|a, b| {
        b.volume_freed
            .partial_cmp(&a.volume_freed)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut plan = RearrangementPlan::default();
    let mut planned_items: BTreeSet<String> = BTreeSet::new();
    // Volume/weight already committed to each destination by accepted moves
    let mut committed: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for candidate in candidates {
        if plan.covers(volume, weight) {
            break;
        }
        if planned_items.contains(&candidate.item_id) {
            continue;
        }
        let destination = match store.containers.get(&candidate.to_container) {
            Some(c) => c,
            None => continue,
        };
        let (extra_volume, extra_weight) = committed
            .get(&candidate.to_container)
            .copied()
            .unwrap_or((0.0, 0.0));
        if !destination.capacity.can_hold(
            extra_volume + candidate.volume_freed,
            extra_weight + candidate.weight_freed,
        ) {
            continue;
        }

        let entry = committed
            .entry(candidate.to_container.clone())
            .or_insert((0.0, 0.0));
        entry.0 += candidate.volume_freed;
        entry.1 += candidate.weight_freed;
        planned_items.insert(candidate.item_id.clone());
        plan.freed_volume += candidate.volume_freed;
        plan.freed_weight += candidate.weight_freed;
        plan.moves.push(candidate);
    }

    plan
}
