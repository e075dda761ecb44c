//! Firework representation returned to clients.

use crate::bitmap::BinaryMatrix;
use crate::store::{FireworkId, FireworkRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A firework with its bitmap unpacked to booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FireworkView {
    pub id: FireworkId,
    pub is_shareable: bool,
    /// Row-major bitmap; `true` is a light pixel.
    pub pixel_data: BinaryMatrix,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FireworkRecord> for FireworkView {
    fn from(record: FireworkRecord) -> Self {
        Self {
            id: record.id,
            is_shareable: record.is_shareable,
            pixel_data: record.pixel_data.unpack(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
