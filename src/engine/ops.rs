//! The stowage engine: applies decisions to an owned inventory store.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use super::types::{
    ContainerSpec, ItemUpdate, ManifestItem, PlaceOutcome, PlaceRequest, ReturnManifest,
    WasteContainerSpec, DEFAULT_PRIORITY,
};
use crate::audit::{AuditRecord, AuditSink, MemoryAudit};
use crate::error::StowageError;
use crate::placement::{select_container, PlacementConfig, PlacementQuery};
use crate::rearrange::{plan_rearrangement, Move, RearrangementPlan};
use crate::retrieval::{estimate_and_rank, RetrievalConfig, RetrievalEstimate};
use crate::stats::{self, EfficiencyMetrics, ExpiringItem, StorageStatus};
use crate::store::{
    ContainerKind, InventoryStore, Item, ItemStatus, Location, StorageContainer, WasteContainer,
};
use crate::waste::select_waste_container;

/// Facade over the four decision components and the capacity ledger.
///
/// Owns the store for the duration of a request cycle; the caller loads a
/// snapshot, runs operations, and takes the store back for persistence
/// ([`into_store`](StowageEngine::into_store)). The engine itself never
/// touches the wall clock or the filesystem — every operation takes an
/// explicit `now`, and serialization lives in [`crate::persist`].
///
/// Concurrency is the caller's problem: mutating operations on the same
/// store must be serialized externally.
pub struct StowageEngine<A: AuditSink = MemoryAudit> {
    store: InventoryStore,
    placement: PlacementConfig,
    retrieval: RetrievalConfig,
    audit: A,
}

impl StowageEngine<MemoryAudit> {
    /// Creates an engine with an in-memory audit log.
    pub fn new(store: InventoryStore) -> Self {
        Self::with_audit(store, MemoryAudit::new())
    }

    /// System efficiency summary combining the store gauges with figures
    /// derived from the in-memory audit log (search-to-retrieval latency,
    /// moves per rearrangement, expiration management).
    pub fn efficiency_metrics(&self, today: NaiveDate) -> EfficiencyMetrics {
        stats::efficiency_metrics(&self.store, &self.audit, today)
    }
}

impl<A: AuditSink> StowageEngine<A> {
    /// Creates an engine writing audit records to the given sink.
    pub fn with_audit(store: InventoryStore, audit: A) -> Self {
        Self {
            store,
            placement: PlacementConfig::default(),
            retrieval: RetrievalConfig::default(),
            audit,
        }
    }

    pub fn with_placement_config(mut self, config: PlacementConfig) -> Self {
        self.placement = config;
        self
    }

    pub fn with_retrieval_config(mut self, config: RetrievalConfig) -> Self {
        self.retrieval = config;
        self
    }

    /// Read access to the store.
    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Hands the store back, consuming the engine.
    pub fn into_store(self) -> InventoryStore {
        self.store
    }

    /// Read access to the audit sink.
    pub fn audit_log(&self) -> &A {
        &self.audit
    }

    fn record(&mut self, action: &str, details: serde_json::Value, now: DateTime<Utc>) {
        self.audit.record(AuditRecord {
            timestamp: now,
            action: action.to_string(),
            details,
        });
    }

    // ------------------------------------------------------------------
    // Placement
    // ------------------------------------------------------------------

    /// Stows a new item.
    ///
    /// With an explicit `container_id` the target is validated and used
    /// directly. Otherwise the placement scorer picks the best container;
    /// if nothing is eligible, the rearrangement planner is consulted and
    /// a covering plan is proposed via
    /// [`PlaceOutcome::RearrangementNeeded`]. When not even rearrangement
    /// can free enough space, the request fails with
    /// [`StowageError::NoSpace`].
    pub fn place(
        &mut self,
        request: PlaceRequest,
        now: DateTime<Utc>,
    ) -> Result<PlaceOutcome, StowageError> {
        if request.volume <= 0.0 || request.weight <= 0.0 {
            return Err(StowageError::InvalidRequest(
                "item volume and weight must be positive".into(),
            ));
        }
        let priority = request.priority.unwrap_or(DEFAULT_PRIORITY);
        if !(1..=5).contains(&priority) {
            return Err(StowageError::InvalidRequest(format!(
                "priority must be 1-5, got {priority}"
            )));
        }
        if self.store.items.contains_key(&request.item_id) {
            return Err(StowageError::DuplicateId(request.item_id));
        }

        let container_id = match &request.container_id {
            Some(id) => {
                let container = self
                    .store
                    .containers
                    .get(id)
                    .ok_or_else(|| StowageError::UnknownContainer(id.clone()))?;
                if container.kind != ContainerKind::Storage {
                    return Err(StowageError::InvalidRequest(format!(
                        "{id} is not a storage container"
                    )));
                }
                id.clone()
            }
            None => {
                let query = PlacementQuery::new(request.volume, request.weight, priority);
                match select_container(&query, self.store.storage_containers(), &self.placement) {
                    Some(id) => id,
                    None => {
                        let plan =
                            plan_rearrangement(request.volume, request.weight, &self.store);
                        if !plan.is_empty() && plan.covers(request.volume, request.weight) {
                            tracing::debug!(
                                item_id = %request.item_id,
                                moves = plan.len(),
                                "no direct fit, proposing rearrangement"
                            );
                            return Ok(PlaceOutcome::RearrangementNeeded { plan });
                        }
                        return Err(StowageError::NoSpace);
                    }
                }
            }
        };

        self.commit_placement(&request, priority, &container_id, now)?;
        tracing::info!(
            item_id = %request.item_id,
            container_id = %container_id,
            "placed item"
        );
        self.record(
            "place_item",
            json!({ "item_id": request.item_id, "container_id": container_id }),
            now,
        );
        Ok(PlaceOutcome::Placed { container_id })
    }

    fn commit_placement(
        &mut self,
        request: &PlaceRequest,
        priority: u8,
        container_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StowageError> {
        let container = self
            .store
            .containers
            .get_mut(container_id)
            .ok_or_else(|| StowageError::UnknownContainer(container_id.to_string()))?;
        // First mutation; a capacity rejection leaves the store untouched
        container
            .capacity
            .charge(container_id, request.volume, request.weight)?;
        container.items.push(request.item_id.clone());

        let item = Item {
            id: request.item_id.clone(),
            name: request.name.clone(),
            location: Location::Storage(container_id.to_string()),
            priority,
            expiration_date: request.expiration_date,
            volume: request.volume,
            weight: request.weight,
            category: request
                .category
                .clone()
                .unwrap_or_else(|| crate::store::GENERAL_CATEGORY.to_string()),
            status: ItemStatus::Active,
            arrival_date: now.date_naive(),
            last_accessed: now,
        };
        self.store.items.insert(item.id.clone(), item);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Retrieval
    // ------------------------------------------------------------------

    /// Finds active items matching `query` (case-insensitive substring of
    /// name or id) and an optional exact category, ranked fastest
    /// retrieval first.
    pub fn search(
        &mut self,
        query: &str,
        category: Option<&str>,
        now: DateTime<Utc>,
    ) -> Vec<RetrievalEstimate> {
        let needle = query.to_lowercase();
        let matches = self.store.active_items().filter(|item| {
            (item.name.to_lowercase().contains(&needle)
                || item.id.to_lowercase().contains(&needle))
                && category.is_none_or(|c| item.category == c)
        });
        let ranked = estimate_and_rank(matches, &self.store, now.date_naive(), &self.retrieval);

        let result_ids: Vec<&str> = ranked.iter().map(|e| e.item_id.as_str()).collect();
        self.record(
            "search_item",
            json!({
                "query": query,
                "category": category,
                "results": result_ids,
            }),
            now,
        );
        ranked
    }

    /// Records that an astronaut took the item in hand, bumping its
    /// last-accessed timestamp. Only active items can be retrieved; waste
    /// items are out of reach once routed.
    pub fn retrieve(&mut self, item_id: &str, now: DateTime<Utc>) -> Result<Item, StowageError> {
        let item = self
            .store
            .items
            .get_mut(item_id)
            .ok_or_else(|| StowageError::UnknownItem(item_id.to_string()))?;
        if item.status != ItemStatus::Active {
            return Err(StowageError::InvalidRequest(format!(
                "{item_id} has been routed to waste"
            )));
        }
        item.last_accessed = now;
        let snapshot = item.clone();

        self.record(
            "retrieve_item",
            json!({
                "item_id": snapshot.id,
                "item_name": snapshot.name,
                "container_id": snapshot.location.container_id(),
            }),
            now,
        );
        Ok(snapshot)
    }

    // ------------------------------------------------------------------
    // Rearrangement
    // ------------------------------------------------------------------

    /// Executes a rearrangement plan, all or nothing.
    ///
    /// Every move is validated and applied against a working copy; the
    /// store only changes when the whole plan went through. A stale move
    /// (entity gone, item elsewhere, capacity taken in the meantime)
    /// fails the call with the store untouched.
    ///
    /// Returns the number of moves completed, which is always the full
    /// plan length on success.
    pub fn execute_rearrangement(
        &mut self,
        plan: &RearrangementPlan,
        now: DateTime<Utc>,
    ) -> Result<usize, StowageError> {
        if plan.is_empty() {
            return Err(StowageError::InvalidRequest(
                "empty rearrangement plan".into(),
            ));
        }

        let mut working = self.store.clone();
        for m in &plan.moves {
            apply_move(&mut working, m, now)?;
        }
        self.store = working;

        tracing::info!(moves = plan.len(), "rearrangement executed");
        self.record(
            "rearrange_items",
            json!({ "moves_completed": plan.len(), "plan": plan }),
            now,
        );
        Ok(plan.len())
    }

    // ------------------------------------------------------------------
    // Waste
    // ------------------------------------------------------------------

    /// Marks an item as waste and routes it to a disposal container.
    ///
    /// The waste router picks the container; capacity moves from the old
    /// storage container to the waste container, the item's location is
    /// rewritten and its status flips to waste. Fails with
    /// [`StowageError::NoWasteContainer`] when nothing accepts the item.
    pub fn mark_as_waste(
        &mut self,
        item_id: &str,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<String, StowageError> {
        let item = self
            .store
            .items
            .get(item_id)
            .ok_or_else(|| StowageError::UnknownItem(item_id.to_string()))?;
        if item.status != ItemStatus::Active {
            return Err(StowageError::InvalidRequest(format!(
                "{item_id} is already waste"
            )));
        }
        let Location::Storage(old_container_id) = item.location.clone() else {
            return Err(StowageError::Inconsistent(format!(
                "active item {item_id} not in a storage container"
            )));
        };
        let (volume, weight) = (item.volume, item.weight);
        let (name, category) = (item.name.clone(), item.category.clone());

        let waste_id = select_waste_container(
            &category,
            volume,
            weight,
            self.store.waste_containers.values(),
        )
        .ok_or(StowageError::NoWasteContainer)?;

        if !self.store.containers.contains_key(&old_container_id) {
            return Err(StowageError::UnknownContainer(old_container_id));
        }

        // The router already verified capacity against this snapshot
        let waste = self
            .store
            .waste_containers
            .get_mut(&waste_id)
            .ok_or_else(|| StowageError::UnknownWasteContainer(waste_id.clone()))?;
        waste.capacity.charge(&waste_id, volume, weight)?;

        if let Some(old) = self.store.containers.get_mut(&old_container_id) {
            old.capacity.release(volume, weight);
            old.items.retain(|id| id != item_id);
        }
        if let Some(item) = self.store.items.get_mut(item_id) {
            item.status = ItemStatus::Waste;
            item.location = Location::Waste(waste_id.clone());
            item.last_accessed = now;
        }

        tracing::info!(item_id = %item_id, waste_container = %waste_id, "item routed to waste");
        self.record(
            "mark_as_waste",
            json!({
                "item_id": item_id,
                "item_name": name,
                "reason": reason.unwrap_or("used"),
                "waste_container": waste_id,
            }),
            now,
        );
        Ok(waste_id)
    }

    /// Confirms a waste container undocked: deletes it together with every
    /// item aboard. Returns the number of items removed.
    pub fn confirm_return(
        &mut self,
        waste_container_id: &str,
        now: DateTime<Utc>,
    ) -> Result<usize, StowageError> {
        let container = self
            .store
            .waste_containers
            .get(waste_container_id)
            .ok_or_else(|| StowageError::UnknownWasteContainer(waste_container_id.to_string()))?;
        let container_name = container.name.clone();

        let removed: Vec<String> = self
            .store
            .waste_items_in(waste_container_id)
            .iter()
            .map(|item| item.id.clone())
            .collect();
        for id in &removed {
            self.store.items.remove(id);
        }
        self.store.waste_containers.remove(waste_container_id);

        tracing::info!(
            waste_container = %waste_container_id,
            items_removed = removed.len(),
            "waste container returned"
        );
        self.record(
            "confirm_return",
            json!({
                "waste_container_id": waste_container_id,
                "container_name": container_name,
                "items_removed": removed.len(),
            }),
            now,
        );
        Ok(removed.len())
    }

    /// Generates the return manifest for a waste container: what goes down
    /// with it and how full it is.
    pub fn return_manifest(
        &mut self,
        waste_container_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ReturnManifest, StowageError> {
        let container = self
            .store
            .waste_containers
            .get(waste_container_id)
            .ok_or_else(|| StowageError::UnknownWasteContainer(waste_container_id.to_string()))?;

        let items: Vec<ManifestItem> = self
            .store
            .waste_items_in(waste_container_id)
            .iter()
            .map(|item| ManifestItem {
                item_id: item.id.clone(),
                name: item.name.clone(),
                category: item.category.clone(),
                volume: item.volume,
                weight: item.weight,
            })
            .collect();
        let total_volume: f64 = items.iter().map(|i| i.volume).sum();
        let total_weight: f64 = items.iter().map(|i| i.weight).sum();

        let manifest = ReturnManifest {
            container_id: container.id.clone(),
            container_name: container.name.clone(),
            undock_date: container.undock_date,
            total_items: items.len(),
            total_volume,
            total_weight,
            volume_utilization: if container.capacity.total_volume > 0.0 {
                total_volume / container.capacity.total_volume * 100.0
            } else {
                0.0
            },
            weight_utilization: if container.capacity.max_weight > 0.0 {
                total_weight / container.capacity.max_weight * 100.0
            } else {
                0.0
            },
            items,
        };

        self.record(
            "return_planning",
            json!({
                "waste_container_id": waste_container_id,
                "total_items": manifest.total_items,
                "total_volume": manifest.total_volume,
                "total_weight": manifest.total_weight,
            }),
            now,
        );
        Ok(manifest)
    }

    /// Schedules the undock date for a waste container. Returns how many
    /// items are currently aboard.
    pub fn schedule_undock(
        &mut self,
        waste_container_id: &str,
        undock_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<usize, StowageError> {
        let container = self
            .store
            .waste_containers
            .get_mut(waste_container_id)
            .ok_or_else(|| StowageError::UnknownWasteContainer(waste_container_id.to_string()))?;
        container.undock_date = Some(undock_date);
        let aboard = self.store.waste_items_in(waste_container_id).len();

        self.record(
            "create_undock_plan",
            json!({
                "waste_container_id": waste_container_id,
                "undock_date": undock_date,
                "items_count": aboard,
            }),
            now,
        );
        Ok(aboard)
    }

    // ------------------------------------------------------------------
    // Item and container administration
    // ------------------------------------------------------------------

    /// Updates an item's mutable fields, optionally relocating it.
    ///
    /// Relocation applies only to active items and goes through the same
    /// capacity checks as placement; the old container's gauges are fully
    /// released and the new one's fully charged, never both.
    pub fn update_item(
        &mut self,
        item_id: &str,
        update: ItemUpdate,
        now: DateTime<Utc>,
    ) -> Result<Item, StowageError> {
        // Reject before the relocation below mutates anything
        if let Some(priority) = update.priority {
            if !(1..=5).contains(&priority) {
                return Err(StowageError::InvalidRequest(format!(
                    "priority must be 1-5, got {priority}"
                )));
            }
        }

        let current = self
            .store
            .items
            .get(item_id)
            .ok_or_else(|| StowageError::UnknownItem(item_id.to_string()))?;

        if let Some(new_container_id) = &update.location {
            let relocating = current.status == ItemStatus::Active
                && current.location != Location::Storage(new_container_id.clone());
            if relocating {
                let Location::Storage(old_container_id) = current.location.clone() else {
                    return Err(StowageError::Inconsistent(format!(
                        "active item {item_id} not in a storage container"
                    )));
                };
                let (volume, weight) = (current.volume, current.weight);

                if !self.store.containers.contains_key(&old_container_id) {
                    return Err(StowageError::UnknownContainer(old_container_id));
                }
                let new_container = self
                    .store
                    .containers
                    .get_mut(new_container_id)
                    .ok_or_else(|| StowageError::UnknownContainer(new_container_id.clone()))?;
                if new_container.kind != ContainerKind::Storage {
                    return Err(StowageError::InvalidRequest(format!(
                        "{new_container_id} is not a storage container"
                    )));
                }
                new_container
                    .capacity
                    .charge(new_container_id, volume, weight)?;
                new_container.items.push(item_id.to_string());

                if let Some(old) = self.store.containers.get_mut(&old_container_id) {
                    old.capacity.release(volume, weight);
                    old.items.retain(|id| id != item_id);
                }
                if let Some(item) = self.store.items.get_mut(item_id) {
                    item.location = Location::Storage(new_container_id.clone());
                }
            }
        }

        let item = self
            .store
            .items
            .get_mut(item_id)
            .ok_or_else(|| StowageError::UnknownItem(item_id.to_string()))?;
        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(priority) = update.priority {
            item.priority = priority;
        }
        if let Some(category) = update.category {
            item.category = category;
        }
        if let Some(expiration) = update.expiration_date {
            item.expiration_date = Some(expiration);
        }
        item.last_accessed = now;
        let snapshot = item.clone();

        self.record(
            "update_item",
            json!({ "item_id": item_id, "item": snapshot }),
            now,
        );
        Ok(snapshot)
    }

    /// Creates a storage container.
    pub fn add_container(
        &mut self,
        spec: ContainerSpec,
        now: DateTime<Utc>,
    ) -> Result<(), StowageError> {
        if self.store.containers.contains_key(&spec.container_id) {
            return Err(StowageError::DuplicateId(spec.container_id));
        }
        if spec.total_volume <= 0.0 || spec.max_weight <= 0.0 {
            return Err(StowageError::InvalidRequest(
                "container limits must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&spec.accessibility_factor) {
            return Err(StowageError::InvalidRequest(format!(
                "accessibility_factor must be in [0, 1], got {}",
                spec.accessibility_factor
            )));
        }

        let container = StorageContainer {
            id: spec.container_id.clone(),
            name: spec.name.clone(),
            capacity: crate::store::Capacity::new(spec.total_volume, spec.max_weight),
            items: Vec::new(),
            kind: spec.kind,
            accessibility_factor: spec.accessibility_factor,
        };
        self.store
            .containers
            .insert(container.id.clone(), container);

        self.record(
            "add_container",
            json!({
                "container_id": spec.container_id,
                "container_name": spec.name,
                "type": spec.kind,
            }),
            now,
        );
        Ok(())
    }

    /// Creates a waste container.
    pub fn add_waste_container(
        &mut self,
        spec: WasteContainerSpec,
        now: DateTime<Utc>,
    ) -> Result<(), StowageError> {
        if self.store.waste_containers.contains_key(&spec.container_id) {
            return Err(StowageError::DuplicateId(spec.container_id));
        }
        if spec.total_volume <= 0.0 || spec.max_weight <= 0.0 {
            return Err(StowageError::InvalidRequest(
                "container limits must be positive".into(),
            ));
        }

        let accepted_categories = if spec.accepted_categories.is_empty() {
            vec![crate::store::GENERAL_CATEGORY.to_string()]
        } else {
            spec.accepted_categories.clone()
        };
        let container = WasteContainer {
            id: spec.container_id.clone(),
            name: spec.name.clone(),
            capacity: crate::store::Capacity::new(spec.total_volume, spec.max_weight),
            accepted_categories: accepted_categories.clone(),
            undock_date: spec.undock_date,
        };
        self.store
            .waste_containers
            .insert(container.id.clone(), container);

        self.record(
            "add_waste_container",
            json!({
                "container_id": spec.container_id,
                "container_name": spec.name,
                "waste_categories": accepted_categories,
            }),
            now,
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read-only aggregation
    // ------------------------------------------------------------------

    /// Overall storage, waste and item statistics.
    pub fn storage_status(&self, today: NaiveDate) -> StorageStatus {
        stats::storage_status(&self.store, today)
    }

    /// Active items expiring within the window, soonest first.
    pub fn expiring_items(&self, within_days: i64, today: NaiveDate) -> Vec<ExpiringItem> {
        stats::expiring_items(&self.store, today, within_days)
    }
}

/// Applies one move to the working store, validating referenced entities
/// and capacity at execution time.
fn apply_move(
    store: &mut InventoryStore,
    m: &Move,
    now: DateTime<Utc>,
) -> Result<(), StowageError> {
    if m.from_container == m.to_container {
        return Err(StowageError::InvalidMove(format!(
            "{}: source and destination are both {}",
            m.item_id, m.from_container
        )));
    }
    let item = store
        .items
        .get(&m.item_id)
        .ok_or_else(|| StowageError::InvalidMove(format!("unknown item {}", m.item_id)))?;
    if item.status != ItemStatus::Active {
        return Err(StowageError::InvalidMove(format!(
            "{} is no longer active",
            m.item_id
        )));
    }
    if item.location != Location::Storage(m.from_container.clone()) {
        return Err(StowageError::InvalidMove(format!(
            "{} is not in {}",
            m.item_id, m.from_container
        )));
    }
    let (volume, weight) = (item.volume, item.weight);

    if !store.containers.contains_key(&m.from_container) {
        return Err(StowageError::InvalidMove(format!(
            "unknown container {}",
            m.from_container
        )));
    }
    let to = store.containers.get_mut(&m.to_container).ok_or_else(|| {
        StowageError::InvalidMove(format!("unknown container {}", m.to_container))
    })?;
    if to.kind != ContainerKind::Storage {
        return Err(StowageError::InvalidMove(format!(
            "{} is not a storage container",
            m.to_container
        )));
    }
    to.capacity.charge(&m.to_container, volume, weight)?;
    to.items.push(m.item_id.clone());

    if let Some(from) = store.containers.get_mut(&m.from_container) {
        from.capacity.release(volume, weight);
        from.items.retain(|id| id != &m.item_id);
    }
    if let Some(item) = store.items.get_mut(&m.item_id) {
        item.location = Location::Storage(m.to_container.clone());
        item.last_accessed = now;
    }
    Ok(())
}
