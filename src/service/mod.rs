//! Firework ingestion and retrieval.
//!
//! Sequences the bitmap pipeline against a [`FireworkStore`]:
//!
//! - **ingest**: decode → resample → binarize → pack → insert
//! - **get / list / update**: load → unpack
//! - **delete**: remove, without touching the pipeline
//!
//! Ingestion is all-or-nothing. A decode failure happens before the store
//! is touched, so no partial record can be written.

mod view;

pub use view::FireworkView;

use crate::bitmap::{Converter, DecodeError, CANONICAL_PIXELS};
use crate::store::{FireworkId, FireworkRecord, FireworkStore, NewFirework, StoreError};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by firework operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The upload is not a decodable JPEG or PNG. Caused by client input.
    #[error("invalid image: {0}")]
    Decode(#[from] DecodeError),
    #[error("firework {0} not found")]
    NotFound(FireworkId),
    /// The store rejected the operation.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Unavailable(msg) => Self::Persistence(msg),
        }
    }
}

/// Creates, reads, updates and deletes fireworks.
///
/// Cheap to clone; clones share the same store.
pub struct FireworkService<S> {
    store: Arc<S>,
    converter: Converter,
}

impl<S> Clone for FireworkService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            converter: self.converter.clone(),
        }
    }
}

impl<S: FireworkStore> FireworkService<S> {
    /// Creates a service backed by `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            converter: Converter::new(),
        }
    }

    /// Returns the backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Converts an uploaded image to a bitmap and stores it.
    pub fn ingest(&self, image: &[u8], is_shareable: bool) -> Result<FireworkView, ServiceError> {
        let pixel_data = self.converter.convert_packed(image).map_err(|e| {
            tracing::debug!(error = %e, bytes = image.len(), "Rejected upload");
            e
        })?;

        let record = self.store.insert(NewFirework {
            is_shareable,
            pixel_data,
        })?;

        tracing::info!(id = record.id, is_shareable, "Created firework");
        Ok(self.view(record))
    }

    /// Loads one firework.
    pub fn get(&self, id: FireworkId) -> Result<FireworkView, ServiceError> {
        let record = self.store.get(id)?;
        Ok(self.view(record))
    }

    /// Loads every firework in ascending id order.
    pub fn list(&self) -> Result<Vec<FireworkView>, ServiceError> {
        let records = self.store.list()?;
        Ok(records.into_iter().map(|r| self.view(r)).collect())
    }

    /// Replaces the shareability flag of a firework.
    pub fn update(&self, id: FireworkId, is_shareable: bool) -> Result<FireworkView, ServiceError> {
        let record = self.store.set_shareable(id, is_shareable)?;
        tracing::info!(id, is_shareable, "Updated firework");
        Ok(self.view(record))
    }

    /// Removes a firework.
    pub fn delete(&self, id: FireworkId) -> Result<(), ServiceError> {
        self.store.delete(id)?;
        tracing::info!(id, "Deleted firework");
        Ok(())
    }

    fn view(&self, record: FireworkRecord) -> FireworkView {
        if !record.pixel_data.is_canonical() {
            tracing::warn!(
                id = record.id,
                len = record.pixel_data.len(),
                expected = CANONICAL_PIXELS,
                "Stored pixel data has non-canonical length"
            );
        }
        FireworkView::from(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::test_images::solid_png;
    use crate::bitmap::PackedBytes;
    use crate::store::MemoryStore;

    fn service() -> FireworkService<MemoryStore> {
        FireworkService::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_ingest_black_image() {
        let service = service();
        let view = service
            .ingest(&solid_png(10, 10, [0, 0, 0, 255]), true)
            .unwrap();

        assert!(view.is_shareable);
        assert_eq!(view.pixel_data.len(), CANONICAL_PIXELS);
        assert_eq!(view.pixel_data.count_lit(), 0);

        let stored = service.store().get(view.id).unwrap();
        assert!(stored.pixel_data.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_ingest_white_non_square_image() {
        let view = service()
            .ingest(&solid_png(200, 100, [255, 255, 255, 255]), false)
            .unwrap();

        assert!(!view.is_shareable);
        assert_eq!(view.pixel_data.count_lit(), CANONICAL_PIXELS);
    }

    #[test]
    fn test_ingest_is_deterministic() {
        let service = service();
        let image = solid_png(33, 12, [140, 120, 130, 255]);

        let first = service.ingest(&image, true).unwrap();
        let second = service.ingest(&image, true).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.pixel_data, second.pixel_data);
    }

    #[test]
    fn test_decode_failure_writes_nothing() {
        let service = service();

        let result = service.ingest(b"plain text, not an image", true);

        assert!(matches!(result, Err(ServiceError::Decode(_))));
        assert_eq!(service.store().count().unwrap(), 0);
    }

    #[test]
    fn test_get_returns_fresh_copy() {
        let service = service();
        let created = service
            .ingest(&solid_png(4, 4, [255, 255, 255, 255]), true)
            .unwrap();

        let fetched = service.get(created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_get_missing() {
        assert!(matches!(service().get(42), Err(ServiceError::NotFound(42))));
    }

    #[test]
    fn test_update_only_changes_flag() {
        let service = service();
        let created = service
            .ingest(&solid_png(4, 4, [255, 255, 255, 255]), false)
            .unwrap();

        let updated = service.update(created.id, true).unwrap();

        assert!(updated.is_shareable);
        assert_eq!(updated.pixel_data, created.pixel_data);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn test_update_missing() {
        assert!(matches!(
            service().update(9, true),
            Err(ServiceError::NotFound(9))
        ));
    }

    #[test]
    fn test_delete_then_get() {
        let service = service();
        let created = service
            .ingest(&solid_png(4, 4, [0, 0, 0, 255]), true)
            .unwrap();

        service.delete(created.id).unwrap();

        assert!(matches!(
            service.get(created.id),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(created.id),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_includes_legacy_records() {
        let service = service();
        service
            .ingest(&solid_png(4, 4, [0, 0, 0, 255]), true)
            .unwrap();
        service
            .store()
            .insert(NewFirework {
                is_shareable: true,
                pixel_data: PackedBytes::from_vec(vec![1, 0, 1, 0, 1, 0, 1, 0, 1, 0]),
            })
            .unwrap();

        let views = service.list().unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[1].pixel_data.len(), 10);
        assert_eq!(views[1].pixel_data.count_lit(), 5);
    }
}
