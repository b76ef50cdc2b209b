//! Inventory data model: items, containers, waste containers.

use super::capacity::Capacity;
use crate::error::StowageError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category sentinel accepted by waste containers that take anything.
pub const GENERAL_CATEGORY: &str = "general";

/// Lifecycle status of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Stowed in a storage container and available for retrieval.
    Active,
    /// Routed to a waste container, awaiting return.
    Waste,
}

/// Where an item currently sits.
///
/// A tagged reference rather than a raw container id, so storage and waste
/// membership never need string parsing to tell apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Inside the storage container with this id.
    Storage(String),
    /// Inside the waste container with this id.
    Waste(String),
}

impl Location {
    /// The referenced container id, whichever side it is on.
    pub fn container_id(&self) -> &str {
        match self {
            Location::Storage(id) | Location::Waste(id) => id,
        }
    }
}

/// A physical item aboard.
///
/// `volume` and `weight` never change after creation; only location,
/// status, priority, category, expiration and last-accessed are mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub location: Location,

    /// Urgency 1–5; 5 = most urgent, steered toward accessible containers.
    pub priority: u8,

    pub expiration_date: Option<NaiveDate>,
    pub volume: f64,
    pub weight: f64,

    /// Free-form tag, e.g. "food", "medical", "electronic".
    pub category: String,

    pub status: ItemStatus,
    pub arrival_date: NaiveDate,
    pub last_accessed: DateTime<Utc>,
}

/// What role a container plays. Only `Storage` participates in placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Storage,
    Waste,
    Return,
}

/// A bounded-capacity storage unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageContainer {
    pub id: String,
    pub name: String,

    #[serde(flatten)]
    pub capacity: Capacity,

    /// Member item ids in insertion order. Order doubles as a proxy for
    /// retrieval depth: later entries sit on top.
    pub items: Vec<String>,

    pub kind: ContainerKind,

    /// Ease of reach, 0 (hardest) to 1 (easiest).
    pub accessibility_factor: f64,
}

/// A disposal container with a category filter and an optional undock date.
///
/// Membership is not tracked in an item list; it is inferred from each
/// item's [`Location::Waste`] reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteContainer {
    pub id: String,
    pub name: String,

    #[serde(flatten)]
    pub capacity: Capacity,

    /// Waste categories this container takes. The [`GENERAL_CATEGORY`]
    /// sentinel accepts everything.
    pub accepted_categories: Vec<String>,

    pub undock_date: Option<NaiveDate>,
}

impl WasteContainer {
    /// Whether this container takes the given waste category.
    pub fn accepts(&self, category: &str) -> bool {
        self.accepted_categories
            .iter()
            .any(|c| c == category || c == GENERAL_CATEGORY)
    }
}

/// The in-memory inventory: items plus both container populations.
///
/// `BTreeMap` keys give deterministic iteration order, so every scan over
/// containers visits them in ascending id order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryStore {
    pub items: BTreeMap<String, Item>,
    pub containers: BTreeMap<String, StorageContainer>,
    pub waste_containers: BTreeMap<String, WasteContainer>,
}

impl InventoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage containers that participate in placement.
    pub fn storage_containers(&self) -> impl Iterator<Item = &StorageContainer> {
        self.containers
            .values()
            .filter(|c| c.kind == ContainerKind::Storage)
    }

    /// Active items only.
    pub fn active_items(&self) -> impl Iterator<Item = &Item> {
        self.items
            .values()
            .filter(|i| i.status == ItemStatus::Active)
    }

    /// Ids of items located in the given waste container.
    pub fn waste_items_in(&self, waste_container_id: &str) -> Vec<&Item> {
        self.items
            .values()
            .filter(|i| matches!(&i.location, Location::Waste(id) if id == waste_container_id))
            .collect()
    }

    /// Validates the store for consistency.
    ///
    /// Checks capacity bounds, that every item's location resolves, that
    /// container item lists agree with item locations, and that the
    /// redundant gauges equal the sums over member items.
    pub fn validate(&self) -> Result<(), StowageError> {
        for container in self.containers.values() {
            container.capacity.check(&container.id)?;

            let mut sum_volume = 0.0;
            let mut sum_weight = 0.0;
            for item_id in &container.items {
                let item = self.items.get(item_id).ok_or_else(|| {
                    StowageError::Inconsistent(format!(
                        "{} lists unknown item {item_id}",
                        container.id
                    ))
                })?;
                if item.location != Location::Storage(container.id.clone()) {
                    return Err(StowageError::Inconsistent(format!(
                        "{} lists {item_id} but the item is located elsewhere",
                        container.id
                    )));
                }
                sum_volume += item.volume;
                sum_weight += item.weight;
            }
            if (sum_volume - container.capacity.used_volume).abs() > 1e-6 {
                return Err(StowageError::Inconsistent(format!(
                    "{}: used_volume {} != member sum {sum_volume}",
                    container.id, container.capacity.used_volume
                )));
            }
            if (sum_weight - container.capacity.current_weight).abs() > 1e-6 {
                return Err(StowageError::Inconsistent(format!(
                    "{}: current_weight {} != member sum {sum_weight}",
                    container.id, container.capacity.current_weight
                )));
            }
        }

        for container in self.waste_containers.values() {
            container.capacity.check(&container.id)?;
        }

        for item in self.items.values() {
            if item.volume <= 0.0 || item.weight <= 0.0 {
                return Err(StowageError::Inconsistent(format!(
                    "{}: non-positive volume or weight",
                    item.id
                )));
            }
            match (&item.location, item.status) {
                (Location::Storage(id), ItemStatus::Active) => {
                    let container = self.containers.get(id).ok_or_else(|| {
                        StowageError::Inconsistent(format!(
                            "{} located in unknown container {id}",
                            item.id
                        ))
                    })?;
                    if !container.items.contains(&item.id) {
                        return Err(StowageError::Inconsistent(format!(
                            "{} located in {id} but not in its item list",
                            item.id
                        )));
                    }
                }
                (Location::Waste(id), ItemStatus::Waste) => {
                    if !self.waste_containers.contains_key(id) {
                        return Err(StowageError::Inconsistent(format!(
                            "{} located in unknown waste container {id}",
                            item.id
                        )));
                    }
                }
                (location, status) => {
                    return Err(StowageError::Inconsistent(format!(
                        "{}: status {status:?} does not match location {location:?}",
                        item.id
                    )));
                }
            }
        }

        Ok(())
    }
}
