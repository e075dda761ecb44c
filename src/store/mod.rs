//! Persistence of firework records.
//!
//! The store owns packed pixel data once it has been written. It is the
//! only shared resource in the service and is responsible for its own
//! atomicity; callers perform no locking of their own.

mod memory;
mod record;

pub use memory::MemoryStore;
pub use record::{FireworkId, FireworkRecord, NewFirework};

use thiserror::Error;

/// Errors returned by a firework store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("firework {0} not found")]
    NotFound(FireworkId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage backend for firework records.
///
/// Implementations must be safe to call from many request handlers at
/// once.
pub trait FireworkStore: Send + Sync {
    /// Persists a new record, assigning its id and timestamps.
    fn insert(&self, firework: NewFirework) -> Result<FireworkRecord, StoreError>;

    /// Loads a record by id.
    fn get(&self, id: FireworkId) -> Result<FireworkRecord, StoreError>;

    /// Loads every record in ascending id order.
    fn list(&self) -> Result<Vec<FireworkRecord>, StoreError>;

    /// Replaces the shareability flag, leaving pixel data untouched.
    fn set_shareable(&self, id: FireworkId, is_shareable: bool)
        -> Result<FireworkRecord, StoreError>;

    /// Removes a record.
    fn delete(&self, id: FireworkId) -> Result<(), StoreError>;

    /// Returns the number of stored records.
    fn count(&self) -> Result<usize, StoreError> {
        self.list().map(|records| records.len())
    }
}
