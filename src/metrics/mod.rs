//! Prometheus metrics for the firework service.
//!
//! # Metrics Exposed
//!
//! - `fireworks_ingested_total` - Images converted and stored
//! - `fireworks_decode_failures_total` - Uploads rejected as undecodable
//! - `fireworks_updated_total` - Shareability updates
//! - `fireworks_deleted_total` - Fireworks deleted
//! - `fireworks_stored` - Fireworks currently stored
//!
//! The registry is served at `GET /metrics` by the HTTP server when
//! metrics are enabled in the configuration.
//!
//! # Example
//!
//! ```
//! use fireworks_bitmap::metrics::MetricsRegistry;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! registry.record_ingest();
//! registry.set_stored(1);
//!
//! assert!(registry.encode().unwrap().contains("fireworks_stored 1"));
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry};
