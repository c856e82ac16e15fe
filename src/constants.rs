//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Centralized configuration constants for Cachewarden.
//!
//! All magic numbers used by the scanner, TTL resolver and store adapter are
//! defined here with their purpose and usage context.

// ============================================================================
// Scan Constants
// ============================================================================

/// Maximum number of raw keys listed per pool.
///
/// A listing never returns more rows than this for a single pool, even when
/// the store holds more matching keys.
pub const MAX_KEYS_PER_POOL: usize = 1000;

/// `COUNT` hint passed to every `SCAN` call.
pub const SCAN_BATCH_SIZE: usize = 200;

/// Cursor value that both starts and ends a `SCAN` traversal.
pub const SCAN_CURSOR_START: &str = "0";

/// Number of keys deleted per command when a pool clears its namespace.
pub const CLEAR_DELETE_BATCH_SIZE: usize = 500;

// ============================================================================
// TTL Constants
// ============================================================================

/// TTL reported when the lookup failed or the reply could not be interpreted.
///
/// Distinct from the store's own `-1` (no expiry) and `-2` (missing key).
pub const TTL_UNKNOWN: i64 = -3;

/// TTL the store reports for a key without expiry.
pub const TTL_NO_EXPIRY: i64 = -1;

/// TTL the store reports for a key that does not exist.
pub const TTL_MISSING: i64 = -2;

/// Default number of TTL lookups in flight at once.
///
/// `1` keeps lookups strictly sequential.
pub const DEFAULT_TTL_CONCURRENCY: usize = 1;

// ============================================================================
// Store Constants
// ============================================================================

/// Default deadline for a single store round trip (2 seconds).
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 2000;

/// Default deadline for establishing the store connection (5 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

// ============================================================================
// Pool Constants
// ============================================================================

/// Logical name of the general application cache pool.
pub const APP_POOL_NAME: &str = "cache.app";

/// Display label of the general application cache pool.
pub const APP_POOL_LABEL: &str = "Application cache";

/// Logical name of the ORM query/result cache pool.
pub const RESULT_POOL_NAME: &str = "result_cache";

/// Display label of the ORM query/result cache pool.
pub const RESULT_POOL_LABEL: &str = "ORM result cache";
