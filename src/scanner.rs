//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 键扫描
//!
//! 使用增量 SCAN 命令枚举命名空间下的原始键，从不使用 KEYS。
//!
//! # 特性
//!
//! - **有界**: 每个命名空间最多收集 `max_keys` 个键
//! - **去重**: SCAN 可能在不同批次中重复返回同一个键
//! - **有序**: 结果按字典序排序
//! - **非快照**: 扫描期间被创建或删除的键可能出现也可能不出现

use std::collections::BTreeSet;
use tracing::{debug, trace};

use crate::constants::{MAX_KEYS_PER_POOL, SCAN_BATCH_SIZE};
use crate::namespace::scan_pattern;
use crate::outcome::BestEffort;
use crate::store::{Cursor, StoreAdapter};

/// 扫描结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedKeys {
    /// 排序去重后的原始键
    pub keys: Vec<String>,
    /// 是否因达到上限而提前停止
    pub truncated: bool,
}

/// 键扫描器
#[derive(Debug, Clone)]
pub struct KeyScanner {
    store: StoreAdapter,
    max_keys: usize,
    batch_size: usize,
}

impl KeyScanner {
    /// 创建新的扫描器（默认上限和批次大小）
    pub fn new(store: StoreAdapter) -> Self {
        Self {
            store,
            max_keys: MAX_KEYS_PER_POOL,
            batch_size: SCAN_BATCH_SIZE,
        }
    }

    /// 设置每个命名空间的键上限
    pub fn max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys;
        self
    }

    /// 设置 SCAN 的 COUNT 提示
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// 枚举命名空间下的键
    ///
    /// 命名空间为空时直接返回空结果，不访问存储。存储故障时返回已收集到的部分键。
    pub async fn scan_namespace(&self, namespace: Option<&str>) -> BestEffort<ScannedKeys> {
        let Some(namespace) = namespace.filter(|ns| !ns.is_empty()) else {
            return BestEffort::ok(ScannedKeys::default());
        };

        let pattern = scan_pattern(namespace);
        let mut seen = BTreeSet::new();
        let mut cursor = Cursor::start();
        let mut truncated = false;
        let mut rounds = 0usize;

        loop {
            let (page, failure) = self
                .store
                .scan(&cursor, &pattern, self.batch_size)
                .await
                .into_parts();
            rounds += 1;

            if let Some(e) = failure {
                debug!(namespace, rounds, collected = seen.len(), "扫描中断");
                return BestEffort::degraded(
                    ScannedKeys {
                        keys: seen.into_iter().collect(),
                        truncated: false,
                    },
                    e,
                );
            }

            trace!(
                namespace,
                cursor = %cursor,
                next = %page.next,
                batch = page.keys.len(),
                "扫描批次"
            );

            let mut keys = page.keys.into_iter();
            for key in keys.by_ref() {
                if !key.starts_with(namespace) {
                    continue;
                }
                if seen.len() >= self.max_keys {
                    if !seen.contains(&key) {
                        truncated = true;
                        break;
                    }
                    continue;
                }
                seen.insert(key);
            }

            cursor = page.next;
            if seen.len() >= self.max_keys {
                truncated = truncated || keys.next().is_some() || !cursor.is_complete();
                break;
            }
            if cursor.is_complete() {
                break;
            }
        }

        debug!(
            namespace,
            rounds,
            keys = seen.len(),
            truncated,
            "扫描完成"
        );

        BestEffort::ok(ScannedKeys {
            keys: seen.into_iter().collect(),
            truncated,
        })
    }
}

/// 搜索过滤
///
/// 空查询匹配所有行；否则要求小写的 `展示键 + " " + 原始键` 包含小写查询串。
/// 查询串按原样使用，不去除首尾空白。
pub fn matches_query(display_key: &str, raw_key: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    format!("{} {}", display_key, raw_key)
        .to_lowercase()
        .contains(&query.to_lowercase())
}
