//! Prelude module - Commonly used types for quick imports
//!
//! This module re-exports the most commonly used types from Cachewarden,
//! allowing users to import them with a single `use cachewarden::prelude::*;`
//! statement instead of importing each type individually.

// Core types - always available
pub use crate::admin::{CacheAdmin, ClearReport, DeletionReport, KeyListing, KeyRow};
pub use crate::config::{AdminConfig, PoolConfig, ScanConfig, StoreConfig};
pub use crate::error::{AdminError, StoreError};
pub use crate::outcome::BestEffort;

// Pools and registry
pub use crate::pool::{CachePool, NamespaceProvider, StorePool};
pub use crate::registry::{PoolChoice, PoolRegistry};

// Store seam
pub use crate::memory_store::MemoryStore;
pub use crate::store::{Cursor, Reply, ScanPage, StoreAdapter, StoreClient};

// Feature-gated exports
#[cfg(feature = "redis")]
pub use crate::redis_store::{RedisConfig, RedisStore};

#[cfg(feature = "telemetry")]
pub use crate::telemetry::{init_logging, LoggingConfig};
