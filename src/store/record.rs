//! Stored firework records.

use crate::bitmap::PackedBytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a record by the store.
pub type FireworkId = u64;

/// A firework as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireworkRecord {
    pub id: FireworkId,
    /// Whether the firework may be shown to other users.
    pub is_shareable: bool,
    /// Packed bitmap, one byte per pixel. Never modified after creation.
    pub pixel_data: PackedBytes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A firework that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewFirework {
    pub is_shareable: bool,
    pub pixel_data: PackedBytes,
}
