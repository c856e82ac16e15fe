//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! TTL 查询
//!
//! 每个键一次往返。并发度为 1 时严格逐个查询；更高的并发度只影响延迟，
//! 返回顺序始终与输入一致。

use futures::stream::{self, StreamExt};

use crate::constants::DEFAULT_TTL_CONCURRENCY;
use crate::outcome::BestEffort;
use crate::store::StoreAdapter;

/// TTL 查询器
#[derive(Debug, Clone)]
pub struct TtlResolver {
    store: StoreAdapter,
    concurrency: usize,
}

impl TtlResolver {
    pub fn new(store: StoreAdapter) -> Self {
        Self {
            store,
            concurrency: DEFAULT_TTL_CONCURRENCY,
        }
    }

    /// 设置同时在途的查询数
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// 查询单个键
    pub async fn resolve(&self, raw_key: &str) -> BestEffort<i64> {
        self.store.ttl(raw_key).await
    }

    /// 按输入顺序查询多个键
    pub async fn resolve_all(&self, raw_keys: &[String]) -> Vec<BestEffort<i64>> {
        stream::iter(raw_keys.iter().map(|key| self.resolve(key)))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
