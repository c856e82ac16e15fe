//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 删除安全过滤与执行
//!
//! 唯一的破坏性路径。任何候选键在发出删除命令之前都必须通过
//! [`filter_managed_keys`]：只有以某个受管命名空间为字面前缀的键才会被删除。

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::outcome::BestEffort;
use crate::store::StoreAdapter;

/// 过滤结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedKeys {
    /// 属于受管命名空间的键（保持输入顺序，已去重）
    pub managed: Vec<String>,
    /// 被拒绝的外部键
    pub rejected: Vec<String>,
}

/// 将候选键限制在受管命名空间内
///
/// 候选键先去除首尾空白，空串直接丢弃。
pub fn filter_managed_keys<I, S>(candidates: I, namespaces: &[String]) -> ManagedKeys
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let namespaces: Vec<&str> = namespaces
        .iter()
        .map(String::as_str)
        .filter(|ns| !ns.is_empty())
        .collect();

    let mut result = ManagedKeys::default();
    let mut seen = HashSet::new();

    for candidate in candidates {
        let key = candidate.as_ref().trim();
        if key.is_empty() || !seen.insert(key.to_string()) {
            continue;
        }

        if namespaces.iter().any(|ns| key.starts_with(ns)) {
            result.managed.push(key.to_string());
        } else {
            result.rejected.push(key.to_string());
        }
    }

    if !result.rejected.is_empty() {
        warn!(
            rejected = result.rejected.len(),
            "拒绝删除不属于受管命名空间的键: {:?}",
            result.rejected
        );
    }

    result
}

/// 删除执行器
///
/// 先尝试 UNLINK；若删除数为 0 则退回 DEL（部分服务端禁用了 UNLINK），
/// 返回两次尝试中较大的计数。
#[derive(Debug, Clone)]
pub struct DeletionExecutor {
    store: StoreAdapter,
}

impl DeletionExecutor {
    pub fn new(store: StoreAdapter) -> Self {
        Self { store }
    }

    /// 删除已经过滤的键
    ///
    /// 只有两次尝试都失败时结果才标记为降级。
    pub async fn execute(&self, keys: &[String]) -> BestEffort<u64> {
        if keys.is_empty() {
            return BestEffort::ok(0);
        }

        let (unlinked, unlink_failure) = self.store.unlink(keys).await.into_parts();
        if unlinked > 0 {
            debug!(requested = keys.len(), deleted = unlinked, "UNLINK 完成");
            return BestEffort::ok(unlinked);
        }

        if let Some(e) = &unlink_failure {
            debug!("UNLINK 不可用，退回 DEL: {}", e);
        }

        let (deleted, del_failure) = self.store.del(keys).await.into_parts();
        let count = unlinked.max(deleted);

        match (unlink_failure, del_failure) {
            (Some(_), Some(e)) => BestEffort::degraded(count, e),
            _ => {
                debug!(requested = keys.len(), deleted = count, "DEL 完成");
                BestEffort::ok(count)
            }
        }
    }

    /// 分批删除
    pub async fn execute_in_batches(&self, keys: &[String], batch_size: usize) -> BestEffort<u64> {
        let mut total = 0;
        let mut last_failure = None;

        for chunk in keys.chunks(batch_size.max(1)) {
            let (deleted, failure) = self.execute(chunk).await.into_parts();
            total += deleted;
            if failure.is_some() {
                last_failure = failure;
            }
        }

        debug!(requested = keys.len(), deleted = total, "分批删除完成");

        match last_failure {
            Some(e) => BestEffort::degraded(total, e),
            None => BestEffort::ok(total),
        }
    }
}
