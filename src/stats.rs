//! Storage status and expiry aggregation.
//!
//! Read-only summaries over a store snapshot, for the operations console.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::audit::MemoryAudit;
use crate::store::{ContainerKind, InventoryStore, ItemStatus, Location};

/// Utilization summary for one storage container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerUtilization {
    pub container_id: String,
    pub name: String,
    pub kind: ContainerKind,
    pub volume_utilization: f64,
    pub weight_utilization: f64,
    pub item_count: usize,
    pub accessibility_factor: f64,
}

/// Utilization summary for one waste container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteUtilization {
    pub container_id: String,
    pub name: String,
    pub volume_utilization: f64,
    pub weight_utilization: f64,
    pub accepted_categories: Vec<String>,
    pub undock_date: Option<NaiveDate>,
}

/// Aggregate capacity across a container population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapacityTotals {
    pub total_volume: f64,
    pub used_volume: f64,
    pub volume_utilization: f64,
    pub total_weight_capacity: f64,
    pub current_weight: f64,
    pub weight_utilization: f64,
    pub container_count: usize,
}

impl CapacityTotals {
    fn finish(mut self) -> Self {
        self.volume_utilization = if self.total_volume > 0.0 {
            self.used_volume / self.total_volume * 100.0
        } else {
            0.0
        };
        self.weight_utilization = if self.total_weight_capacity > 0.0 {
            self.current_weight / self.total_weight_capacity * 100.0
        } else {
            0.0
        };
        self
    }
}

/// Item population summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemTotals {
    pub active_items: usize,
    pub waste_items: usize,
    pub by_category: BTreeMap<String, usize>,

    /// Active items with `0 <= days_to_expiry <= 7`. Bounded below, unlike
    /// the retrieval estimator's flag: already-expired items do not count
    /// as "expiring soon" here.
    pub expiring_soon: usize,
}

/// Full status snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageStatus {
    pub storage: CapacityTotals,
    pub waste: CapacityTotals,
    pub items: ItemTotals,
    pub storage_containers: Vec<ContainerUtilization>,
    pub waste_containers: Vec<WasteUtilization>,
}

/// One entry from an expiring-items query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiringItem {
    pub item_id: String,
    pub name: String,
    pub days_to_expiry: i64,
    pub expiration_date: NaiveDate,
    pub container_id: String,
    pub container_name: String,
    pub priority: u8,
    pub category: String,
}

/// Computes overall storage, waste and item statistics for a snapshot.
pub fn storage_status(store: &InventoryStore, today: NaiveDate) -> StorageStatus {
    let mut storage = CapacityTotals::default();
    let mut storage_containers = Vec::with_capacity(store.containers.len());
    for container in store.containers.values() {
        storage.total_volume += container.capacity.total_volume;
        storage.used_volume += container.capacity.used_volume;
        storage.total_weight_capacity += container.capacity.max_weight;
        storage.current_weight += container.capacity.current_weight;
        storage.container_count += 1;
        storage_containers.push(ContainerUtilization {
            container_id: container.id.clone(),
            name: container.name.clone(),
            kind: container.kind,
            volume_utilization: container.capacity.volume_utilization(),
            weight_utilization: container.capacity.weight_utilization(),
            item_count: container.items.len(),
            accessibility_factor: container.accessibility_factor,
        });
    }

    let mut waste = CapacityTotals::default();
    let mut waste_containers = Vec::with_capacity(store.waste_containers.len());
    for container in store.waste_containers.values() {
        waste.total_volume += container.capacity.total_volume;
        waste.used_volume += container.capacity.used_volume;
        waste.total_weight_capacity += container.capacity.max_weight;
        waste.current_weight += container.capacity.current_weight;
        waste.container_count += 1;
        waste_containers.push(WasteUtilization {
            container_id: container.id.clone(),
            name: container.name.clone(),
            volume_utilization: container.capacity.volume_utilization(),
            weight_utilization: container.capacity.weight_utilization(),
            accepted_categories: container.accepted_categories.clone(),
            undock_date: container.undock_date,
        });
    }

    let mut items = ItemTotals::default();
    for item in store.items.values() {
        match item.status {
            ItemStatus::Active => {
                items.active_items += 1;
                *items.by_category.entry(item.category.clone()).or_insert(0) += 1;
                if let Some(expiry) = item.expiration_date {
                    let days = (expiry - today).num_days();
                    if (0..=7).contains(&days) {
                        items.expiring_soon += 1;
                    }
                }
            }
            ItemStatus::Waste => items.waste_items += 1,
        }
    }

    StorageStatus {
        storage: storage.finish(),
        waste: waste.finish(),
        items,
        storage_containers,
        waste_containers,
    }
}

/// Active items expiring within `within_days` (inclusive, never already
/// expired), sorted soonest first.
pub fn expiring_items(
    store: &InventoryStore,
    today: NaiveDate,
    within_days: i64,
) -> Vec<ExpiringItem> {
    let mut expiring: Vec<ExpiringItem> = store
        .active_items()
        .filter_map(|item| {
            let expiry = item.expiration_date?;
            let days = (expiry - today).num_days();
            if !(0..=within_days).contains(&days) {
                return None;
            }
            let Location::Storage(container_id) = &item.location else {
                return None;
            };
            let container = store.containers.get(container_id)?;
            Some(ExpiringItem {
                item_id: item.id.clone(),
                name: item.name.clone(),
                days_to_expiry: days,
                expiration_date: expiry,
                container_id: container.id.clone(),
                container_name: container.name.clone(),
                priority: item.priority,
                category: item.category.clone(),
            })
        })
        .collect();
    expiring.sort_by_key(|e| e.days_to_expiry);
    expiring
}

/// Rearrangement throughput derived from the audit log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RearrangementEfficiency {
    pub avg_moves_per_rearrangement: f64,
    pub total_rearrangements: usize,
}

/// How well expirations are being managed: the share of active items that
/// have NOT been left to expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirationManagement {
    pub efficiency_percentage: f64,
    pub expired_items: usize,
    pub total_items: usize,
}

/// System efficiency summary combining store gauges with log-derived
/// figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    /// Volume utilization across storage containers, in percent.
    pub space_utilization: f64,

    /// Mean seconds between an item appearing in search results and its
    /// retrieval. Zero when no search/retrieve pair exists in the log.
    pub average_retrieval_time_seconds: f64,

    /// Volume utilization across waste containers, in percent.
    pub waste_management_efficiency: f64,

    pub rearrangement: RearrangementEfficiency,
    pub expiration: ExpirationManagement,
}

/// Computes efficiency metrics for a snapshot and its audit log.
///
/// The retrieval figure pairs each `retrieve_item` record with the most
/// recent `search_item` record that listed the item; searches with no
/// subsequent retrieval contribute nothing.
pub fn efficiency_metrics(
    store: &InventoryStore,
    audit: &MemoryAudit,
    today: NaiveDate,
) -> EfficiencyMetrics {
    let mut storage = CapacityTotals::default();
    for container in store.containers.values() {
        storage.total_volume += container.capacity.total_volume;
        storage.used_volume += container.capacity.used_volume;
    }
    let mut waste = CapacityTotals::default();
    for container in store.waste_containers.values() {
        waste.total_volume += container.capacity.total_volume;
        waste.used_volume += container.capacity.used_volume;
    }

    let mut search_timestamps: BTreeMap<String, DateTime<Utc>> = BTreeMap::new();
    let mut retrieval_seconds: Vec<f64> = Vec::new();
    let mut total_moves = 0u64;
    let mut rearrangements = 0usize;
    for record in audit.records() {
        match record.action.as_str() {
            "search_item" => {
                if let Some(results) = record.details.get("results").and_then(|r| r.as_array()) {
                    for id in results.iter().filter_map(|v| v.as_str()) {
                        search_timestamps.insert(id.to_string(), record.timestamp);
                    }
                }
            }
            "retrieve_item" => {
                let retrieved = record
                    .details
                    .get("item_id")
                    .and_then(|v| v.as_str())
                    .and_then(|id| search_timestamps.get(id));
                if let Some(searched_at) = retrieved {
                    let elapsed = record.timestamp - *searched_at;
                    retrieval_seconds.push(elapsed.num_milliseconds() as f64 / 1000.0);
                }
            }
            "rearrange_items" => {
                rearrangements += 1;
                total_moves += record
                    .details
                    .get("moves_completed")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0);
            }
            _ => {}
        }
    }
    let average_retrieval_time_seconds = if retrieval_seconds.is_empty() {
        0.0
    } else {
        retrieval_seconds.iter().sum::<f64>() / retrieval_seconds.len() as f64
    };
    let avg_moves_per_rearrangement = if rearrangements > 0 {
        total_moves as f64 / rearrangements as f64
    } else {
        0.0
    };

    let mut expired_items = 0;
    let mut total_items = 0;
    for item in store.active_items() {
        total_items += 1;
        if item.expiration_date.is_some_and(|expiry| expiry < today) {
            expired_items += 1;
        }
    }
    let efficiency_percentage = if total_items > 0 {
        100.0 - expired_items as f64 / total_items as f64 * 100.0
    } else {
        100.0
    };

    EfficiencyMetrics {
        space_utilization: storage.finish().volume_utilization,
        average_retrieval_time_seconds,
        waste_management_efficiency: waste.finish().volume_utilization,
        rearrangement: RearrangementEfficiency {
            avg_moves_per_rearrangement,
            total_rearrangements: rearrangements,
        },
        expiration: ExpirationManagement {
            efficiency_percentage,
            expired_items,
            total_items,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditRecord, AuditSink};
    use crate::store::{Capacity, Item, StorageContainer, WasteContainer};
    use chrono::TimeZone;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture() -> InventoryStore {
        let mut store = InventoryStore::new();
        let mut capacity = Capacity::new(100.0, 200.0);
        capacity.charge("storage_001", 10.0, 5.0).unwrap();
        store.containers.insert(
            "storage_001".into(),
            StorageContainer {
                id: "storage_001".into(),
                name: "Main Storage A".into(),
                capacity,
                items: vec!["item_001".into(), "item_002".into()],
                kind: ContainerKind::Storage,
                accessibility_factor: 0.9,
            },
        );
        store.waste_containers.insert(
            "waste_001".into(),
            WasteContainer {
                id: "waste_001".into(),
                name: "General Waste".into(),
                capacity: Capacity::new(30.0, 50.0),
                accepted_categories: vec!["general".into()],
                undock_date: None,
            },
        );
        for (id, category, expiry) in [
            ("item_001", "food", Some(date(2026, 9, 3))),
            ("item_002", "food", Some(date(2026, 8, 29))),
        ] {
            store.items.insert(
                id.into(),
                Item {
                    id: id.into(),
                    name: id.to_uppercase(),
                    location: Location::Storage("storage_001".into()),
                    priority: 3,
                    expiration_date: expiry,
                    volume: 5.0,
                    weight: 2.5,
                    category: category.into(),
                    status: ItemStatus::Active,
                    arrival_date: date(2026, 1, 1),
                    last_accessed: DateTime::<Utc>::MIN_UTC,
                },
            );
        }
        store
    }

    #[test]
    fn test_storage_totals() {
        let status = storage_status(&fixture(), date(2026, 8, 30));
        assert_eq!(status.storage.container_count, 1);
        assert!((status.storage.volume_utilization - 10.0).abs() < 1e-10);
        assert!((status.storage.weight_utilization - 2.5).abs() < 1e-10);
        assert_eq!(status.waste.container_count, 1);
        assert!(status.waste.volume_utilization.abs() < 1e-10);
    }

    #[test]
    fn test_item_totals_bounded_expiry_window() {
        // item_001 expires in 4 days and counts; item_002 expired yesterday
        // and does not (bounded window, unlike the estimator flag).
        let status = storage_status(&fixture(), date(2026, 8, 30));
        assert_eq!(status.items.active_items, 2);
        assert_eq!(status.items.waste_items, 0);
        assert_eq!(status.items.expiring_soon, 1);
        assert_eq!(status.items.by_category.get("food"), Some(&2));
    }

    #[test]
    fn test_expiring_items_sorted_and_bounded() {
        let expiring = expiring_items(&fixture(), date(2026, 8, 30), 7);
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].item_id, "item_001");
        assert_eq!(expiring[0].days_to_expiry, 4);
    }

    #[test]
    fn test_expiring_items_window_widens() {
        let expiring = expiring_items(&fixture(), date(2026, 8, 25), 30);
        // Both items are in the future from this vantage point
        assert_eq!(expiring.len(), 2);
        assert_eq!(expiring[0].item_id, "item_002"); // 4 days out
        assert_eq!(expiring[1].item_id, "item_001"); // 9 days out
    }

    fn record(timestamp: DateTime<Utc>, action: &str, details: serde_json::Value) -> AuditRecord {
        AuditRecord {
            timestamp,
            action: action.into(),
            details,
        }
    }

    #[test]
    fn test_efficiency_metrics_from_log() {
        let mut audit = MemoryAudit::new();
        let t0 = Utc.with_ymd_and_hms(2026, 8, 30, 9, 0, 0).unwrap();
        audit.record(record(
            t0,
            "search_item",
            json!({"query": "item", "results": ["item_001"]}),
        ));
        audit.record(record(
            t0 + chrono::Duration::seconds(30),
            "retrieve_item",
            json!({"item_id": "item_001"}),
        ));
        audit.record(record(t0, "rearrange_items", json!({"moves_completed": 2})));
        audit.record(record(t0, "rearrange_items", json!({"moves_completed": 4})));

        let metrics = efficiency_metrics(&fixture(), &audit, date(2026, 8, 30));
        assert!((metrics.space_utilization - 10.0).abs() < 1e-10);
        assert!((metrics.average_retrieval_time_seconds - 30.0).abs() < 1e-10);
        assert!(metrics.waste_management_efficiency.abs() < 1e-10);
        assert_eq!(metrics.rearrangement.total_rearrangements, 2);
        assert!((metrics.rearrangement.avg_moves_per_rearrangement - 3.0).abs() < 1e-10);
        // item_002 expired yesterday and is still active: 1 of 2 items
        assert_eq!(metrics.expiration.expired_items, 1);
        assert_eq!(metrics.expiration.total_items, 2);
        assert!((metrics.expiration.efficiency_percentage - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_efficiency_metrics_empty_log() {
        let metrics = efficiency_metrics(&fixture(), &MemoryAudit::new(), date(2026, 8, 25));
        assert!(metrics.average_retrieval_time_seconds.abs() < 1e-10);
        assert_eq!(metrics.rearrangement.total_rearrangements, 0);
        assert!(metrics.rearrangement.avg_moves_per_rearrangement.abs() < 1e-10);
        // Nothing expired yet from this vantage point
        assert!((metrics.expiration.efficiency_percentage - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_efficiency_metrics_empty_store() {
        let metrics = efficiency_metrics(
            &InventoryStore::new(),
            &MemoryAudit::new(),
            date(2026, 8, 30),
        );
        assert!(metrics.space_utilization.abs() < 1e-10);
        assert_eq!(metrics.expiration.total_items, 0);
        assert!((metrics.expiration.efficiency_percentage - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_retrieval_without_prior_search_ignored() {
        let mut audit = MemoryAudit::new();
        let t0 = Utc.with_ymd_and_hms(2026, 8, 30, 9, 0, 0).unwrap();
        audit.record(record(t0, "retrieve_item", json!({"item_id": "item_001"})));

        let metrics = efficiency_metrics(&fixture(), &audit, date(2026, 8, 30));
        assert!(metrics.average_retrieval_time_seconds.abs() < 1e-10);
    }
}
