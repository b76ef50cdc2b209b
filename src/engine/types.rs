//! Request and outcome types for engine operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rearrange::RearrangementPlan;
use crate::store::ContainerKind;

/// Default priority for items that do not state one.
pub const DEFAULT_PRIORITY: u8 = 3;

/// A request to stow a new item.
///
/// # Examples
///
/// ```
/// use stowage::engine::PlaceRequest;
///
/// let request = PlaceRequest::new("item_042", "Food Packet B", 0.5, 0.3)
///     .with_priority(4)
///     .with_category("food");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceRequest {
    pub item_id: String,
    pub name: String,
    pub volume: f64,
    pub weight: f64,

    /// Urgency 1–5. Defaults to 3 (medium) when absent.
    pub priority: Option<u8>,

    pub expiration_date: Option<NaiveDate>,

    /// Defaults to `"general"` when absent.
    pub category: Option<String>,

    /// Explicit target container, bypassing the scorer. The container must
    /// exist, be a storage container, and have capacity.
    pub container_id: Option<String>,
}

impl PlaceRequest {
    pub fn new(
        item_id: impl Into<String>,
        name: impl Into<String>,
        volume: f64,
        weight: f64,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            volume,
            weight,
            priority: None,
            expiration_date: None,
            category: None,
            container_id: None,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_expiration(mut self, date: NaiveDate) -> Self {
        self.expiration_date = Some(date);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_container(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }
}

/// How a placement request resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaceOutcome {
    /// The item was stowed.
    Placed { container_id: String },

    /// Nothing fits as-is, but executing the plan would free enough
    /// capacity. The item has NOT been placed; execute the plan, then
    /// place again.
    RearrangementNeeded { plan: RearrangementPlan },
}

/// A partial update to an item's mutable fields.
///
/// Unset fields are left alone. `location` relocates an active item with
/// full capacity checks; volume and weight cannot change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub priority: Option<u8>,
    pub category: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub location: Option<String>,
}

impl ItemUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_expiration(mut self, date: NaiveDate) -> Self {
        self.expiration_date = Some(date);
        self
    }

    pub fn with_location(mut self, container_id: impl Into<String>) -> Self {
        self.location = Some(container_id.into());
        self
    }
}

/// Administrative request to create a storage container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub container_id: String,
    pub name: String,
    pub total_volume: f64,
    pub max_weight: f64,
    pub kind: ContainerKind,

    /// Ease of reach, 0 (hardest) to 1 (easiest). Defaults to 0.5.
    pub accessibility_factor: f64,
}

impl ContainerSpec {
    pub fn new(
        container_id: impl Into<String>,
        name: impl Into<String>,
        total_volume: f64,
        max_weight: f64,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            name: name.into(),
            total_volume,
            max_weight,
            kind: ContainerKind::Storage,
            accessibility_factor: 0.5,
        }
    }

    pub fn with_kind(mut self, kind: ContainerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_accessibility(mut self, factor: f64) -> Self {
        self.accessibility_factor = factor;
        self
    }
}

/// Administrative request to create a waste container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteContainerSpec {
    pub container_id: String,
    pub name: String,
    pub total_volume: f64,
    pub max_weight: f64,

    /// Accepted waste categories. Defaults to `["general"]` when empty.
    pub accepted_categories: Vec<String>,

    pub undock_date: Option<NaiveDate>,
}

impl WasteContainerSpec {
    pub fn new(
        container_id: impl Into<String>,
        name: impl Into<String>,
        total_volume: f64,
        max_weight: f64,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            name: name.into(),
            total_volume,
            max_weight,
            accepted_categories: Vec::new(),
            undock_date: None,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_undock_date(mut self, date: NaiveDate) -> Self {
        self.undock_date = Some(date);
        self
    }
}

/// One waste item listed on a return manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestItem {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub volume: f64,
    pub weight: f64,
}

/// What goes back down when a waste container undocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnManifest {
    pub container_id: String,
    pub container_name: String,
    pub undock_date: Option<NaiveDate>,
    pub items: Vec<ManifestItem>,
    pub total_items: usize,
    pub total_volume: f64,
    pub total_weight: f64,
    pub volume_utilization: f64,
    pub weight_utilization: f64,
}
