//! Fireworks Bitmap Library
//!
//! Stores user-submitted images as fixed-size monochrome bitmaps
//! ("fireworks") and serves them over HTTP.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! upload → bitmap (decode → resample → binarize → pack) → store
//! store → bitmap (unpack) → response
//!            ↑
//!         service (orchestration)  ←  server (HTTP)
//! ```
//!
//! # Design Principles
//!
//! - **Fixed footprint**: every bitmap is exactly 54×54, stretched rather
//!   than letterboxed
//! - **Stable storage**: one byte per pixel, unchanged from existing rows
//! - **All-or-nothing ingest**: a failed decode never writes a record
//! - **Stateless pipeline**: conversions share nothing and run concurrently
//!
//! # Example
//!
//! ```no_run
//! use fireworks_bitmap::{FireworkService, MemoryStore};
//! use std::sync::Arc;
//!
//! let service = FireworkService::new(Arc::new(MemoryStore::new()));
//!
//! let upload = std::fs::read("firework.png").unwrap();
//! let created = service.ingest(&upload, true).unwrap();
//!
//! assert_eq!(created.pixel_data.len(), 54 * 54);
//! print!("{}", created.pixel_data.render_ascii());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod bitmap;
pub mod config;
pub mod metrics;
pub mod server;
pub mod service;
pub mod store;

// Re-export commonly used types at crate root
pub use bitmap::{BinaryMatrix, Converter, DecodeError, PackedBytes};
pub use config::FileConfig;
pub use server::{AppState, FireworkServer};
pub use service::{FireworkService, FireworkView, ServiceError};
pub use store::{FireworkRecord, FireworkStore, MemoryStore};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
