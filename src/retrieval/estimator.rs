//! Retrieval-time estimation and ranking.

use super::config::RetrievalConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::{InventoryStore, Item, Location};

/// One ranked search result: an item with its estimated access cost and
/// expiry outlook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalEstimate {
    pub item_id: String,
    pub name: String,
    pub container_id: String,
    pub container_name: String,
    pub priority: u8,
    pub category: String,

    /// Estimated minutes to get the item in hand.
    pub estimated_minutes: f64,

    pub expiration_date: Option<NaiveDate>,

    /// Days until expiry; negative once expired.
    pub days_to_expiry: Option<i64>,

    /// Set when `days_to_expiry` is at or below the configured window.
    /// Deliberately has no lower bound, so expired items stay flagged.
    pub expiring_soon: bool,
}

/// Estimates retrieval time for each candidate item and ranks the result
/// fastest-first.
///
/// The estimate combines container accessibility with depth of burial,
/// approximated by insertion order: later-added items sit on top and cost
/// less to dig out. The sort is stable, so equal estimates retain the
/// relative input order. Read-only and deterministic: calling it twice on
/// the same store yields the same ordering.
///
/// Items whose location does not resolve to a storage container are
/// skipped; they cannot be ranked without an accessibility factor.
pub fn estimate_and_rank<'a>(
    items: impl IntoIterator<Item = &'a Item>,
    store: &InventoryStore,
    today: NaiveDate,
    config: &RetrievalConfig,
) -> Vec<RetrievalEstimate> {
    let mut estimates: Vec<RetrievalEstimate> = items
        .into_iter()
        .filter_map(|item| {
            let Location::Storage(container_id) = &item.location else {
                return None;
            };
            let container = store.containers.get(container_id)?;
            let position = container.items.iter().position(|id| id == &item.id)?;

            let access = (1.0 - container.accessibility_factor) * config.accessibility_minutes;
            let depth = position as f64 / container.items.len().max(1) as f64;
            let estimated_minutes = access + depth * config.depth_minutes;

            let days_to_expiry = item
                .expiration_date
                .map(|expiry| (expiry - today).num_days());
            let expiring_soon =
                days_to_expiry.is_some_and(|days| days <= config.expiry_window_days);

            Some(RetrievalEstimate {
                item_id: item.id.clone(),
                name: item.name.clone(),
                container_id: container.id.clone(),
                container_name: container.name.clone(),
                priority: item.priority,
                category: item.category.clone(),
                estimated_minutes,
                expiration_date: item.expiration_date,
                days_to_expiry,
                expiring_soon,
            })
        })
        .collect();

    // Vec::sort_by is stable; ties keep input order
    estimates.sort_by(|a, b| {
        a.estimated_minutes
            .partial_cmp(&b.estimated_minutes)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    estimates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Capacity, ContainerKind, ItemStatus, StorageContainer};
    use chrono::{DateTime, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_with(
        containers: Vec<(&str, f64, Vec<&str>)>,
        expirations: &[(&str, NaiveDate)],
    ) -> InventoryStore {
        let mut store = InventoryStore::new();
        for (container_id, accessibility, item_ids) in containers {
            let mut capacity = Capacity::new(100.0, 100.0);
            for item_id in &item_ids {
                capacity.charge(container_id, 1.0, 1.0).unwrap();
                let expiration_date = expirations
                    .iter()
                    .find(|(id, _)| id == item_id)
                    .map(|(_, d)| *d);
                store.items.insert(
                    (*item_id).into(),
                    Item {
                        id: (*item_id).into(),
                        name: item_id.to_uppercase(),
                        location: Location::Storage(container_id.into()),
                        priority: 3,
                        expiration_date,
                        volume: 1.0,
                        weight: 1.0,
                        category: "general".into(),
                        status: ItemStatus::Active,
                        arrival_date: date(2026, 1, 1),
                        last_accessed: DateTime::<Utc>::MIN_UTC,
                    },
                );
            }
            store.containers.insert(
                container_id.into(),
                StorageContainer {
                    id: container_id.into(),
                    name: container_id.to_uppercase(),
                    capacity,
                    items: item_ids.iter().map(|s| s.to_string()).collect(),
                    kind: ContainerKind::Storage,
                    accessibility_factor: accessibility,
                },
            );
        }
        store
    }

    #[test]
    fn test_accessibility_term() {
        // Single item at position 0 of 1: depth term is zero.
        let store = store_with(vec![("c1", 0.7, vec!["a"])], &[]);
        let ranked = estimate_and_rank(
            store.active_items(),
            &store,
            date(2026, 8, 30),
            &RetrievalConfig::default(),
        );
        assert_eq!(ranked.len(), 1);
        // (1 - 0.7) * 10 = 3.0
        assert!((ranked[0].estimated_minutes - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_depth_term_by_insertion_order() {
        let store = store_with(vec![("c1", 1.0, vec!["a", "b", "c", "d"])], &[]);
        let ranked = estimate_and_rank(
            store.active_items(),
            &store,
            date(2026, 8, 30),
            &RetrievalConfig::default(),
        );
        // Accessibility term vanishes; estimates are position/4 * 5
        let by_id: Vec<(&str, f64)> = ranked
            .iter()
            .map(|e| (e.item_id.as_str(), e.estimated_minutes))
            .collect();
        assert_eq!(by_id[0].0, "a");
        assert!((by_id[0].1 - 0.0).abs() < 1e-10);
        assert!((by_id[1].1 - 1.25).abs() < 1e-10);
        assert!((by_id[3].1 - 3.75).abs() < 1e-10);
    }

    #[test]
    fn test_ranking_fastest_first() {
        let store = store_with(vec![("slow", 0.1, vec!["x"]), ("fast", 0.9, vec!["y"])], &[]);
        let ranked = estimate_and_rank(
            store.active_items(),
            &store,
            date(2026, 8, 30),
            &RetrievalConfig::default(),
        );
        assert_eq!(ranked[0].item_id, "y");
        assert_eq!(ranked[1].item_id, "x");
    }

    #[test]
    fn test_idempotent_ordering() {
        let store = store_with(
            vec![("c1", 0.4, vec!["a", "b"]), ("c2", 0.6, vec!["c"])],
            &[],
        );
        let config = RetrievalConfig::default();
        let first = estimate_and_rank(store.active_items(), &store, date(2026, 8, 30), &config);
        let second = estimate_and_rank(store.active_items(), &store, date(2026, 8, 30), &config);
        let ids1: Vec<_> = first.iter().map(|e| &e.item_id).collect();
        let ids2: Vec<_> = second.iter().map(|e| &e.item_id).collect();
        assert_eq!(ids1, ids2);
    }

    #[test]
    fn test_days_to_expiry_and_flag() {
        let today = date(2026, 8, 30);
        let store = store_with(
            vec![("c1", 0.5, vec!["fresh", "soon"])],
            &[
                ("fresh", date(2026, 12, 1)),
                ("soon", date(2026, 9, 3)),
            ],
        );
        let ranked = estimate_and_rank(
            store.active_items(),
            &store,
            today,
            &RetrievalConfig::default(),
        );
        let soon = ranked.iter().find(|e| e.item_id == "soon").unwrap();
        let fresh = ranked.iter().find(|e| e.item_id == "fresh").unwrap();
        assert_eq!(soon.days_to_expiry, Some(4));
        assert!(soon.expiring_soon);
        assert_eq!(fresh.days_to_expiry, Some(93));
        assert!(!fresh.expiring_soon);
    }

    #[test]
    fn test_expired_yesterday_still_flagged() {
        // No lower bound on the window: negative days keep the flag on.
        let today = date(2026, 8, 30);
        let store = store_with(
            vec![("c1", 0.5, vec!["old"])],
            &[("old", date(2026, 8, 29))],
        );
        let ranked = estimate_and_rank(
            store.active_items(),
            &store,
            today,
            &RetrievalConfig::default(),
        );
        assert_eq!(ranked[0].days_to_expiry, Some(-1));
        assert!(ranked[0].expiring_soon);
    }

    #[test]
    fn test_no_expiration_no_flag() {
        let store = store_with(vec![("c1", 0.5, vec!["a"])], &[]);
        let ranked = estimate_and_rank(
            store.active_items(),
            &store,
            date(2026, 8, 30),
            &RetrievalConfig::default(),
        );
        assert_eq!(ranked[0].days_to_expiry, None);
        assert!(!ranked[0].expiring_soon);
    }
}
