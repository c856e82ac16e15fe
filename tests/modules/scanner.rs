//! 键扫描测试
//!
//! 覆盖终止、去重、上限和中途故障

use crate::common::{admin_over, admin_with_scan, default_pools, ScriptedStore};
use cachewarden::prelude::*;
use cachewarden::KeyScanner;
use std::sync::Arc;

#[tokio::test]
async fn test_scan_terminates_on_zero_cursor_not_first_batch() {
    let store = Arc::new(
        ScriptedStore::new()
            .page(&["app:v1:a"])
            .page(&[])
            .page(&["app:v1:c"]),
    );
    let admin = admin_over(store.clone(), &default_pools());

    let listing = admin.list_keys(Some("cache.app"), "").await;

    assert_eq!(store.scan_calls(), 3);
    let keys: Vec<&str> = listing.rows.iter().map(|r| r.raw_key.as_str()).collect();
    assert_eq!(keys, vec!["app:v1:a", "app:v1:c"]);
}

#[tokio::test]
async fn test_scan_deduplicates_across_batches() {
    let store = Arc::new(
        ScriptedStore::new()
            .page(&["app:v1:b", "app:v1:a"])
            .page(&["app:v1:a", "app:v1:c"]),
    );
    let admin = admin_over(store, &default_pools());

    let listing = admin.list_keys(Some("cache.app"), "").await;

    let keys: Vec<&str> = listing.rows.iter().map(|r| r.raw_key.as_str()).collect();
    assert_eq!(keys, vec!["app:v1:a", "app:v1:b", "app:v1:c"]);
}

#[tokio::test]
async fn test_scan_is_bounded_per_pool() {
    let store = Arc::new(ScriptedStore::new().endless("app:v1:"));
    let admin = admin_over(store.clone(), &default_pools());

    let listing = admin.list_keys(Some("cache.app"), "").await;

    assert_eq!(listing.rows.len(), 1000);
    assert_eq!(listing.truncated_pools, vec!["cache.app".to_string()]);
    assert_eq!(store.scan_calls(), 5);
}

#[tokio::test]
async fn test_scan_bound_follows_config() {
    let store = Arc::new(ScriptedStore::new().endless("app:v1:"));
    let scan = ScanConfig {
        max_keys_per_pool: 30,
        batch_size: 7,
        ..Default::default()
    };
    let admin = admin_with_scan(store, &default_pools(), scan);

    let listing = admin.list_keys(None, "").await;

    assert_eq!(listing.rows.len(), 30);
    assert!(listing
        .rows
        .windows(2)
        .all(|pair| pair[0].raw_key < pair[1].raw_key));
}

#[tokio::test]
async fn test_scan_ignores_keys_outside_namespace() {
    let memory = Arc::new(MemoryStore::new());
    memory.insert("app:v1:a", "1", None);
    memory.insert("app:v10:a", "1", None);
    memory.insert("other:app:v1:a", "1", None);

    let admin = admin_over(memory, &default_pools());
    let listing = admin.list_keys(Some("cache.app"), "").await;

    assert_eq!(listing.rows.len(), 1);
    assert_eq!(listing.rows[0].raw_key, "app:v1:a");
}

#[tokio::test]
async fn test_scan_failure_keeps_partial_keys() {
    let store = Arc::new(
        ScriptedStore::new()
            .page(&["app:v1:a"])
            .page(&["app:v1:b"])
            .fail_scan_at(1),
    );
    let scanner = KeyScanner::new(StoreAdapter::new(store));

    let outcome = scanner.scan_namespace(Some("app:v1:")).await;

    assert!(outcome.is_degraded());
    assert!(matches!(
        outcome.failure(),
        Some(StoreError::ConnectionError(_))
    ));
    assert_eq!(outcome.value().keys, vec!["app:v1:a".to_string()]);
}

#[tokio::test]
async fn test_scan_without_namespace_does_not_touch_store() {
    let store = Arc::new(ScriptedStore::new().page(&["app:v1:a"]));
    let scanner = KeyScanner::new(StoreAdapter::new(store.clone()));

    let outcome = scanner.scan_namespace(None).await;
    assert!(outcome.value().keys.is_empty());

    let outcome = scanner.scan_namespace(Some("")).await;
    assert!(outcome.value().keys.is_empty());
    assert_eq!(store.scan_calls(), 0);
}

#[tokio::test]
async fn test_search_filter_is_case_insensitive() {
    let memory = Arc::new(MemoryStore::new());
    memory.insert("app:v1:user:42", "1", None);
    memory.insert("app:v1:order:7", "1", None);
    let pools = [PoolConfig::new("cache.app", "Application cache").namespace("app:")];
    let admin = admin_over(memory, &pools);

    let listing = admin.list_keys(None, "USER").await;

    assert_eq!(listing.rows.len(), 1);
    assert_eq!(listing.rows[0].display_key, "user:42");

    let listing = admin.list_keys(None, "").await;
    assert_eq!(listing.rows.len(), 2);
}
