//! 存储适配层测试
//!
//! 覆盖调用超时、回复解释和故障降级

use crate::common::{admin_over, admin_with_scan, default_pools, ScriptedStore};
use cachewarden::constants::{TTL_MISSING, TTL_UNKNOWN};
use cachewarden::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_ttl_timeout_degrades_to_unknown() {
    let store = StoreAdapter::new(Arc::new(ScriptedStore::new().hang_ttl()))
        .with_call_timeout(Duration::from_millis(20));

    let ttl = store.ttl("app:v1:a").await;

    assert_eq!(*ttl.value(), TTL_UNKNOWN);
    assert!(matches!(ttl.failure(), Some(StoreError::TimeoutError(_))));
}

#[tokio::test]
async fn test_uninterpretable_ttl_reply_is_unknown() {
    let store = StoreAdapter::new(Arc::new(
        ScriptedStore::new()
            .ttl("app:v1:a", Reply::Text("soon".to_string()))
            .ttl("app:v1:b", Reply::Text("42".to_string())),
    ));

    assert_eq!(store.ttl("app:v1:a").await.into_inner(), TTL_UNKNOWN);
    assert_eq!(store.ttl("app:v1:b").await.into_inner(), 42);
    assert_eq!(store.ttl("app:v1:missing").await.into_inner(), TTL_MISSING);
}

#[tokio::test]
async fn test_scan_failure_yields_completed_empty_page() {
    let store = StoreAdapter::new(Arc::new(ScriptedStore::new().fail_scan_at(0)));

    let page = store.scan(&Cursor::start(), "app:*", 10).await;

    assert!(page.is_degraded());
    assert!(page.value().keys.is_empty());
    assert!(page.value().next.is_complete());
}

#[tokio::test]
async fn test_empty_delete_makes_no_round_trip() {
    let client = Arc::new(ScriptedStore::new());
    let store = StoreAdapter::new(client.clone());

    assert_eq!(store.unlink(&[]).await.into_inner(), 0);
    assert_eq!(store.del(&[]).await.into_inner(), 0);
    assert!(client.unlink_calls().is_empty());
    assert!(client.del_calls().is_empty());
}

#[tokio::test]
async fn test_listing_survives_hanging_ttl() {
    let store = Arc::new(ScriptedStore::new().page(&["app:v1:a", "app:v1:b"]).hang_ttl());
    let admin = admin_over(store, &default_pools());

    let listing = admin.list_keys(Some("cache.app"), "").await;

    let ttls: Vec<i64> = listing.rows.iter().map(|row| row.ttl).collect();
    assert_eq!(ttls, vec![TTL_UNKNOWN, TTL_UNKNOWN]);
}

#[tokio::test]
async fn test_listing_ttl_follows_key_order_under_concurrency() {
    let store = Arc::new(
        ScriptedStore::new()
            .page(&["app:v1:c", "app:v1:a", "app:v1:b"])
            .ttl("app:v1:a", Reply::Int(10))
            .ttl("app:v1:b", Reply::Int(-1))
            .ttl("app:v1:c", Reply::Int(30)),
    );
    let scan = ScanConfig {
        ttl_concurrency: 8,
        ..Default::default()
    };
    let admin = admin_with_scan(store, &default_pools(), scan);

    let listing = admin.list_keys(Some("cache.app"), "").await;

    let rows: Vec<(&str, i64)> = listing
        .rows
        .iter()
        .map(|row| (row.display_key.as_str(), row.ttl))
        .collect();
    assert_eq!(rows, vec![("a", 10), ("b", -1), ("c", 30)]);
}

#[tokio::test]
async fn test_listing_records_pool_failure() {
    let store = Arc::new(ScriptedStore::new().page(&["app:v1:a"]).fail_scan_at(0));
    let admin = admin_over(store, &default_pools());

    let listing = admin.list_keys(None, "").await;

    assert!(listing.rows.is_empty());
    assert!(listing.is_degraded());
    assert_eq!(listing.failures[0].pool, "cache.app");
}
