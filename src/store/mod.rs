//! Inventory store and capacity ledger.
//!
//! The data model for items, storage containers and waste containers, plus
//! the shared [`Capacity`] bookkeeping every mutation goes through. The
//! store is a plain value: callers own its lifecycle (load, mutate through
//! the engine, persist) and there are no ambient globals.

mod capacity;
mod types;

pub use capacity::{Capacity, CAPACITY_EPSILON};
pub use types::{
    ContainerKind, InventoryStore, Item, ItemStatus, Location, StorageContainer, WasteContainer,
    GENERAL_CATEGORY,
};
