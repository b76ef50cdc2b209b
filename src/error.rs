//! Error types for stowage operations.
//!
//! A "no eligible container" result from the placement scorer or waste
//! router is `None`, not an error; it only becomes [`StowageError::NoSpace`]
//! or [`StowageError::NoWasteContainer`] once the engine has exhausted its
//! fallbacks.

use thiserror::Error;

/// The main error type for stowage operations.
#[derive(Debug, Error)]
pub enum StowageError {
    /// Referenced item id is absent from the store.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// Referenced storage container id is absent from the store.
    #[error("unknown container: {0}")]
    UnknownContainer(String),

    /// Referenced waste container id is absent from the store.
    #[error("unknown waste container: {0}")]
    UnknownWasteContainer(String),

    /// An id is already taken by an existing item or container.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// A volume or weight delta would exceed a container's limits.
    #[error(
        "capacity exceeded in {container}: needs {needed_volume} volume / {needed_weight} weight, \
         has {free_volume} / {free_weight}"
    )]
    CapacityExceeded {
        container: String,
        needed_volume: f64,
        needed_weight: f64,
        free_volume: f64,
        free_weight: f64,
    },

    /// No storage container can take the item and no covering
    /// rearrangement plan exists.
    #[error("no space available and rearrangement cannot free enough")]
    NoSpace,

    /// No waste container accepts the item's category with capacity to
    /// spare. An administrator must create one.
    #[error("no suitable waste container")]
    NoWasteContainer,

    /// A rearrangement move references a stale or missing entity, or
    /// would violate capacity at execution time.
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// A request failed validation before touching the store.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The store violates one of its own invariants.
    #[error("inconsistent store: {0}")]
    Inconsistent(String),

    /// Snapshot encoding or decoding failure.
    #[error("snapshot codec: {0}")]
    Codec(#[from] serde_json::Error),

    /// Snapshot file I/O failure.
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
}
