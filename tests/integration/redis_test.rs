//! Redis集成测试
//!
//! 需要本地 Redis 服务器：`redis://localhost:6379`

use cachewarden::prelude::*;
use redis::AsyncCommands;
use std::sync::Arc;

const REDIS_URL: &str = "redis://localhost:6379";

async fn seed(keys: &[(&str, Option<u64>)]) {
    let client = redis::Client::open(REDIS_URL).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    for (key, ttl) in keys {
        match ttl {
            Some(seconds) => {
                let _: () = conn.set_ex(*key, "1", *seconds as _).await.unwrap();
            }
            None => {
                let _: () = conn.set(*key, "1").await.unwrap();
            }
        }
    }
}

async fn exists(key: &str) -> bool {
    let client = redis::Client::open(REDIS_URL).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    conn.exists(key).await.unwrap()
}

async fn admin(namespace: &str) -> CacheAdmin {
    let store = RedisStore::connect(&RedisConfig::new(REDIS_URL)).await.unwrap();
    let store = StoreAdapter::new(Arc::new(store));
    let pools = [PoolConfig::new("cache.app", "Application cache").namespace(namespace)];
    let registry = PoolRegistry::from_config(&pools, &store, 200);
    CacheAdmin::new(store, registry, &ScanConfig::default())
}

/// 测试Redis连接
#[tokio::test]
#[ignore] // 需要Redis服务器运行
async fn test_redis_connection() {
    let store = RedisStore::connect(&RedisConfig::new(REDIS_URL)).await;
    assert!(store.is_ok());
}

/// 测试键列表与TTL
#[tokio::test]
#[ignore]
async fn test_redis_list_keys() {
    let ns = "cachewarden:it:list:";
    seed(&[
        ("cachewarden:it:list:a", Some(60)),
        ("cachewarden:it:list:b", None),
        ("cachewarden:it:other:x", None),
    ])
    .await;

    let listing = admin(ns).await.list_keys(None, "").await;

    assert!(!listing.is_degraded());
    let rows: Vec<(&str, i64)> = listing
        .rows
        .iter()
        .map(|row| (row.display_key.as_str(), row.ttl))
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, "a");
    assert!(rows[0].1 > 0 && rows[0].1 <= 60);
    assert_eq!(rows[1], ("b", -1));
}

/// 测试删除只作用于受管命名空间
#[tokio::test]
#[ignore]
async fn test_redis_delete_keys() {
    let ns = "cachewarden:it:del:";
    seed(&[("cachewarden:it:del:a", None), ("cachewarden:it:keep:a", None)]).await;

    let report = admin(ns)
        .await
        .delete_keys(&["cachewarden:it:del:a", "cachewarden:it:keep:a"])
        .await;

    assert_eq!(report.deleted_count(), 1);
    assert!(!exists("cachewarden:it:del:a").await);
    assert!(exists("cachewarden:it:keep:a").await);
}

/// 测试清空池
#[tokio::test]
#[ignore]
async fn test_redis_clear_pool() {
    let ns = "cachewarden:it:clear:";
    let keys: Vec<String> = (0..450).map(|i| format!("{}{}", ns, i)).collect();
    let seeded: Vec<(&str, Option<u64>)> = keys.iter().map(|k| (k.as_str(), None)).collect();
    seed(&seeded).await;
    seed(&[("cachewarden:it:survivor", None)]).await;

    let report = admin(ns).await.clear_pools(None).await;

    assert_eq!(report.cleared_count(), 1);
    assert!(!exists("cachewarden:it:clear:0").await);
    assert!(exists("cachewarden:it:survivor").await);
}
