//! shellcache - An offline-first cache for web application shells.
//!
//! This library precaches a fixed manifest of application assets into a
//! named store at install time, then serves requests network-first with
//! cache fallback: the live network is always tried first, and a stored
//! response is substituted only when the transport itself fails.
//!
//! # Example
//!
//! ```no_run
//! use shellcache::{Manifest, OfflineWorker, RequestKey, WorkerConfig};
//!
//! # async fn example() -> shellcache::Result<()> {
//! // Open a disk-backed worker for the default application-shell manifest.
//! let config = WorkerConfig::new().with_origin("https://app.example.com");
//! let worker = OfflineWorker::open(Manifest::default(), config).await?;
//!
//! // Populate the cache; fails as a whole if any asset cannot be fetched.
//! worker.install().await?;
//!
//! // Network-first: live when reachable, cached when the transport fails.
//! let response = worker.fetch(&RequestKey::get("/dashboard")).await?;
//! println!("{} ({} bytes)", response.status, response.body.len());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod assets;
pub mod config;
pub mod disk;
pub mod error;
pub mod network;
pub mod snapshot;
pub mod store;
pub mod worker;

// Re-export main types for convenience
pub use assets::{DEFAULT_ASSETS, DEFAULT_CACHE_NAME, Manifest};
pub use config::WorkerConfig;
pub use disk::DiskStore;
pub use error::{Error, Result};
pub use network::{HttpNetwork, Network};
pub use snapshot::{RequestKey, ResponseSnapshot};
pub use store::{CacheStore, MemoryStore};
pub use worker::OfflineWorker;

// Re-export the method type used in the public API
pub use reqwest::Method;
