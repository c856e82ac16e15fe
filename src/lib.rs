//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Cachewarden - Cache Pool Administration Engine
//!
//! Lets an operator enumerate, inspect and selectively purge entries in the
//! application's shared cache pools backed by a Redis-compatible store,
//! without flushing keys owned by other systems that share the same store.
//!
//! # API Layers
//!
//! ## Prelude (Quick Start)
//!
//! Use `use cachewarden::prelude::*;` to import all commonly used types.
//!
//! ## Core API
//!
//! - [`CacheAdmin`] - The four operator operations
//! - [`AdminConfig`] - Store, pool and scan configuration
//! - [`PoolRegistry`] - Managed pools and their namespaces
//! - [`StoreAdapter`] - Fail-soft calling surface over a [`StoreClient`]
//! - [`BestEffort`] - Value plus recorded store failure
//!
//! ## Backends (feature-gated)
//!
//! - In-process store (`memory` feature, default)
//! - Redis (requires `redis` feature)
//!
//! # Examples
//!
//! ```rust
//! use cachewarden::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let memory = Arc::new(MemoryStore::new());
//!     memory.insert("app:v1:user:42", "cached", Some(Duration::from_secs(30)));
//!     memory.insert("other:x", "foreign", None);
//!
//!     let store = StoreAdapter::new(memory);
//!     let pools = [PoolConfig::new("cache.app", "Application cache").namespace("app:")];
//!     let registry = PoolRegistry::from_config(&pools, &store, 200);
//!     let admin = CacheAdmin::new(store, registry, &ScanConfig::default());
//!
//!     let listing = admin.list_keys(Some("cache.app"), "").await;
//!     assert_eq!(listing.rows.len(), 1);
//!     assert_eq!(listing.rows[0].display_key, "user:42");
//!
//!     // 外部命名空间的键永远不会被删除
//!     let report = admin.delete_keys(&["other:x", "app:v1:user:42"]).await;
//!     assert_eq!(report.deleted_count(), 1);
//! }
//! ```
//!
//! # Features
//!
//! - **Cursor-based scanning**: `SCAN` with a per-pool cap, never `KEYS`
//! - **Namespace gating**: deletes are restricted to managed key prefixes
//! - **Delete fallback**: `UNLINK` first, `DEL` when it removes nothing
//! - **Best-effort**: store failures degrade to empty results, never errors

pub mod prelude;

pub mod admin;
pub mod config;
pub mod constants;
pub mod deletion;
pub mod display;
pub mod error;
pub mod memory_store;
pub mod namespace;
pub mod outcome;
pub mod pool;
#[cfg(feature = "redis")]
pub mod redis_store;
pub mod registry;
pub mod scanner;
pub mod store;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod ttl;

// 重新导出常用类型
pub use admin::{CacheAdmin, ClearReport, DeletionReport, KeyListing, KeyRow, PoolFailure};
pub use config::{AdminConfig, PoolConfig, ScanConfig, StoreConfig};
pub use deletion::{filter_managed_keys, DeletionExecutor, ManagedKeys};
pub use display::display_key;
pub use error::{AdminError, StoreError};
pub use memory_store::MemoryStore;
pub use outcome::BestEffort;
pub use pool::{CachePool, NamespaceProvider, StorePool};
#[cfg(feature = "redis")]
pub use redis_store::{RedisConfig, RedisStore};
pub use registry::{PoolChoice, PoolEntry, PoolRegistry};
pub use scanner::{matches_query, KeyScanner, ScannedKeys};
pub use store::{Cursor, Reply, ScanPage, StoreAdapter, StoreClient};
#[cfg(feature = "telemetry")]
pub use telemetry::{init_logging, LoggingConfig};
pub use ttl::TtlResolver;
