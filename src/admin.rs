//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 缓存管理引擎
//!
//! 面向运维层的四个操作：列出受管池、列出键、删除键、清空池。
//!
//! 引擎不保存跨调用状态：每次调用都重新解析命名空间并重新扫描。所有操作都不会
//! 返回错误，存储故障体现在结果的 `failures` 中。

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::{AdminConfig, ScanConfig};
use crate::deletion::{filter_managed_keys, DeletionExecutor};
use crate::display::display_key;
use crate::error::{AdminError, StoreError};
use crate::registry::{PoolChoice, PoolEntry, PoolRegistry};
use crate::scanner::{matches_query, KeyScanner};
use crate::store::StoreAdapter;
use crate::ttl::TtlResolver;

/// 键列表行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyRow {
    /// 池逻辑名称
    pub pool: String,
    /// 池展示名称
    pub pool_label: String,
    /// 存储中的原始键
    pub raw_key: String,
    /// 去掉命名空间后的键
    pub display_key: String,
    /// 剩余存活时间（秒），负数为哨兵值
    pub ttl: i64,
}

/// 某个池上记录到的故障
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolFailure {
    pub pool: String,
    pub reason: String,
}

impl PoolFailure {
    fn new(pool: &str, error: &StoreError) -> Self {
        Self {
            pool: pool.to_string(),
            reason: error.to_string(),
        }
    }
}

/// 键列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyListing {
    pub rows: Vec<KeyRow>,
    /// 达到键上限的池
    pub truncated_pools: Vec<String>,
    pub failures: Vec<PoolFailure>,
}

impl KeyListing {
    /// 是否有池因存储故障而结果不完整
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// 删除报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    /// 过滤前的有效候选数
    pub requested: usize,
    /// 通过命名空间过滤的键
    pub managed: Vec<String>,
    /// 被拒绝的外部键
    pub rejected: Vec<String>,
    /// 实际删除数
    pub deleted: u64,
    pub failure: Option<String>,
}

impl DeletionReport {
    pub fn deleted_count(&self) -> u64 {
        self.deleted
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

/// 清空报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    /// 报告清空成功的池数
    pub cleared: usize,
    /// 尝试清空的池
    pub attempted: Vec<String>,
    pub failures: Vec<PoolFailure>,
}

impl ClearReport {
    pub fn cleared_count(&self) -> usize {
        self.cleared
    }

    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// 缓存管理引擎
#[derive(Debug, Clone)]
pub struct CacheAdmin {
    registry: Arc<PoolRegistry>,
    scanner: KeyScanner,
    ttl: TtlResolver,
    executor: DeletionExecutor,
}

impl CacheAdmin {
    /// 使用已构造的注册表创建引擎
    pub fn new(store: StoreAdapter, registry: PoolRegistry, scan: &ScanConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            scanner: KeyScanner::new(store.clone())
                .max_keys(scan.max_keys_per_pool)
                .batch_size(scan.batch_size),
            ttl: TtlResolver::new(store.clone()).concurrency(scan.ttl_concurrency),
            executor: DeletionExecutor::new(store),
        }
    }

    /// 按配置连接存储并构造引擎
    pub async fn from_config(config: &AdminConfig) -> Result<Self, AdminError> {
        config.validate()?;

        let client = config.store.connect().await?;
        let store = StoreAdapter::new(client).with_call_timeout(config.call_timeout());
        let registry = PoolRegistry::from_config(&config.pools, &store, config.scan.batch_size);

        info!(
            backend = store.backend(),
            pools = registry.len(),
            "缓存管理引擎已创建"
        );
        Ok(Self::new(store, registry, &config.scan))
    }

    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    /// 列出受管池
    pub fn list_managed_pools(&self) -> Vec<PoolChoice> {
        self.registry.choices()
    }

    /// 列出池中的键
    ///
    /// `pool` 为空或未知时列出全部池；`query` 非空时按展示键和原始键做不区分大小写的子串过滤。
    #[instrument(skip(self))]
    pub async fn list_keys(&self, pool: Option<&str>, query: &str) -> KeyListing {
        let mut listing = KeyListing::default();

        for entry in self.registry.select(pool) {
            self.list_pool_keys(entry, query, &mut listing).await;
        }

        debug!(
            rows = listing.rows.len(),
            failures = listing.failures.len(),
            "键列表完成"
        );
        listing
    }

    async fn list_pool_keys(&self, entry: &PoolEntry, query: &str, listing: &mut KeyListing) {
        let Some(namespace) = entry.namespace() else {
            debug!(pool = entry.name(), "命名空间未解析，跳过扫描");
            return;
        };

        let (scanned, failure) = self
            .scanner
            .scan_namespace(Some(&namespace))
            .await
            .into_parts();
        if let Some(e) = &failure {
            listing.failures.push(PoolFailure::new(entry.name(), e));
        }
        if scanned.truncated {
            listing.truncated_pools.push(entry.name().to_string());
        }

        let matching: Vec<String> = scanned
            .keys
            .into_iter()
            .filter(|raw| matches_query(display_key(&namespace, raw), raw, query))
            .collect();

        let ttls = self.ttl.resolve_all(&matching).await;
        for (raw_key, ttl) in matching.into_iter().zip(ttls) {
            listing.rows.push(KeyRow {
                pool: entry.name().to_string(),
                pool_label: entry.label().to_string(),
                display_key: display_key(&namespace, &raw_key).to_string(),
                raw_key,
                ttl: ttl.into_inner(),
            });
        }
    }

    /// 删除指定的原始键
    ///
    /// 只有以受管命名空间为字面前缀的键会被删除。
    #[instrument(skip(self, raw_keys))]
    pub async fn delete_keys<S: AsRef<str>>(&self, raw_keys: &[S]) -> DeletionReport {
        let namespaces = self.registry.managed_namespaces();
        let filtered = filter_managed_keys(raw_keys, &namespaces);

        let (deleted, failure) = self.executor.execute(&filtered.managed).await.into_parts();

        let report = DeletionReport {
            requested: filtered.managed.len() + filtered.rejected.len(),
            managed: filtered.managed,
            rejected: filtered.rejected,
            deleted,
            failure: failure.map(|e| e.to_string()),
        };

        info!(
            requested = report.requested,
            rejected = report.rejected.len(),
            deleted = report.deleted,
            "删除键完成"
        );
        report
    }

    /// 清空池
    ///
    /// 调用各池自身的清空操作，统计报告成功的池数。
    #[instrument(skip(self))]
    pub async fn clear_pools(&self, pool: Option<&str>) -> ClearReport {
        let mut report = ClearReport::default();

        for entry in self.registry.select(pool) {
            report.attempted.push(entry.name().to_string());

            let (cleared, failure) = entry.pool().clear().await.into_parts();
            if let Some(e) = &failure {
                warn!(pool = entry.name(), "清空池失败: {}", e);
                report.failures.push(PoolFailure::new(entry.name(), e));
            }
            if cleared {
                report.cleared += 1;
            }
        }

        info!(
            attempted = report.attempted.len(),
            cleared = report.cleared,
            "清空池完成"
        );
        report
    }
}
