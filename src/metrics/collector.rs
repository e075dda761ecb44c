//! Metrics collection and registry.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus metrics registry for the firework service.
///
/// Counters only ever increase; `stored` is refreshed from the store
/// after each write so it survives restarts of the registry.
pub struct MetricsRegistry {
    registry: Registry,

    // Ingestion metrics
    ingested_total: IntCounter,
    decode_failures_total: IntCounter,

    // Store metrics
    updated_total: IntCounter,
    deleted_total: IntCounter,
    stored: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all firework metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let ingested_total = IntCounter::new(
            "fireworks_ingested_total",
            "Total number of images converted and stored",
        )?;
        let decode_failures_total = IntCounter::new(
            "fireworks_decode_failures_total",
            "Total number of uploads rejected as undecodable",
        )?;
        let updated_total = IntCounter::new(
            "fireworks_updated_total",
            "Total number of shareability updates",
        )?;
        let deleted_total = IntCounter::new(
            "fireworks_deleted_total",
            "Total number of fireworks deleted",
        )?;
        let stored = IntGauge::new("fireworks_stored", "Number of fireworks currently stored")?;

        registry.register(Box::new(ingested_total.clone()))?;
        registry.register(Box::new(decode_failures_total.clone()))?;
        registry.register(Box::new(updated_total.clone()))?;
        registry.register(Box::new(deleted_total.clone()))?;
        registry.register(Box::new(stored.clone()))?;

        Ok(Self {
            registry,
            ingested_total,
            decode_failures_total,
            updated_total,
            deleted_total,
            stored,
        })
    }

    /// Records a successful ingestion.
    pub fn record_ingest(&self) {
        self.ingested_total.inc();
    }

    /// Records an upload rejected by the decoder.
    pub fn record_decode_failure(&self) {
        self.decode_failures_total.inc();
    }

    /// Records a shareability update.
    pub fn record_update(&self) {
        self.updated_total.inc();
    }

    /// Records a deletion.
    pub fn record_delete(&self) {
        self.deleted_total.inc();
    }

    /// Sets the number of stored fireworks.
    pub fn set_stored(&self, count: usize) {
        self.stored.set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
