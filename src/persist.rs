//! Snapshot persistence and sample-data bootstrap.
//!
//! The store round-trips through JSON with no format requirement beyond
//! fidelity; loading validates the snapshot before handing it over.

use chrono::{DateTime, Days, Utc};
use std::path::Path;

use crate::error::StowageError;
use crate::store::{
    Capacity, ContainerKind, InventoryStore, Item, ItemStatus, Location, StorageContainer,
    WasteContainer,
};

/// Serializes a store snapshot to pretty-printed JSON.
pub fn to_json(store: &InventoryStore) -> Result<String, StowageError> {
    Ok(serde_json::to_string_pretty(store)?)
}

/// Deserializes and validates a store snapshot.
pub fn from_json(json: &str) -> Result<InventoryStore, StowageError> {
    let store: InventoryStore = serde_json::from_str(json)?;
    store.validate()?;
    Ok(store)
}

/// Writes a store snapshot to a file.
pub fn save_file(store: &InventoryStore, path: &Path) -> Result<(), StowageError> {
    std::fs::write(path, to_json(store)?)?;
    Ok(())
}

/// Reads and validates a store snapshot from a file.
pub fn load_file(path: &Path) -> Result<InventoryStore, StowageError> {
    let json = std::fs::read_to_string(path)?;
    from_json(&json)
}

/// Loads a snapshot if one exists, otherwise seeds the sample store.
pub fn load_or_bootstrap(path: &Path, now: DateTime<Utc>) -> Result<InventoryStore, StowageError> {
    if path.exists() {
        load_file(path)
    } else {
        Ok(sample_store(now))
    }
}

/// First-run sample data: two stowed items, two storage containers and one
/// waste container, with expirations relative to `now`.
pub fn sample_store(now: DateTime<Utc>) -> InventoryStore {
    let today = now.date_naive();
    let mut store = InventoryStore::new();

    let mut main_storage = StorageContainer {
        id: "storage_001".into(),
        name: "Main Storage A".into(),
        capacity: Capacity::new(100.0, 200.0),
        items: vec!["item_001".into()],
        kind: ContainerKind::Storage,
        accessibility_factor: 0.9,
    };
    main_storage.capacity.used_volume = 0.5;
    main_storage.capacity.current_weight = 0.3;
    store
        .containers
        .insert(main_storage.id.clone(), main_storage);

    let mut medical_storage = StorageContainer {
        id: "storage_002".into(),
        name: "Medical Storage".into(),
        capacity: Capacity::new(50.0, 100.0),
        items: vec!["item_002".into()],
        kind: ContainerKind::Storage,
        accessibility_factor: 0.8,
    };
    medical_storage.capacity.used_volume = 2.0;
    medical_storage.capacity.current_weight = 1.5;
    store
        .containers
        .insert(medical_storage.id.clone(), medical_storage);

    store.waste_containers.insert(
        "waste_001".into(),
        WasteContainer {
            id: "waste_001".into(),
            name: "General Waste".into(),
            capacity: Capacity::new(30.0, 50.0),
            accepted_categories: vec!["general".into(), "organic".into()],
            undock_date: today.checked_add_days(Days::new(30)),
        },
    );

    store.items.insert(
        "item_001".into(),
        Item {
            id: "item_001".into(),
            name: "Food Packet A".into(),
            location: Location::Storage("storage_001".into()),
            priority: 4,
            expiration_date: today.checked_add_days(Days::new(90)),
            volume: 0.5,
            weight: 0.3,
            category: "food".into(),
            status: ItemStatus::Active,
            arrival_date: today.checked_sub_days(Days::new(10)).unwrap_or(today),
            last_accessed: now,
        },
    );
    store.items.insert(
        "item_002".into(),
        Item {
            id: "item_002".into(),
            name: "Medical Kit".into(),
            location: Location::Storage("storage_002".into()),
            priority: 5,
            expiration_date: today.checked_add_days(Days::new(180)),
            volume: 2.0,
            weight: 1.5,
            category: "medical".into(),
            status: ItemStatus::Active,
            arrival_date: today.checked_sub_days(Days::new(5)).unwrap_or(today),
            last_accessed: now,
        },
    );

    store
}
