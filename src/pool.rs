//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 缓存池抽象
//!
//! 池不公开读取命名空间的接口，因此由适配器在构造时持有命名空间，
//! 通过 [`NamespaceProvider`] 暴露出来。

use async_trait::async_trait;
use tracing::{info, warn};

use crate::constants::{
    APP_POOL_NAME, CLEAR_DELETE_BATCH_SIZE, RESULT_POOL_NAME, SCAN_BATCH_SIZE,
};
use crate::deletion::DeletionExecutor;
use crate::namespace::{normalize, scan_pattern};
use crate::outcome::BestEffort;
use crate::store::{Cursor, StoreAdapter};

/// 命名空间提供者
pub trait NamespaceProvider: Send + Sync {
    /// 池的根命名空间（键前缀）
    fn root_namespace(&self) -> Option<String>;
}

/// 受管缓存池
#[async_trait]
pub trait CachePool: NamespaceProvider {
    /// 清空池
    ///
    /// 返回池是否报告清空成功。
    async fn clear(&self) -> BestEffort<bool>;
}

/// 基于共享存储的池适配器
#[derive(Debug, Clone)]
pub struct StorePool {
    name: String,
    namespace: Option<String>,
    store: StoreAdapter,
    scan_batch_size: usize,
}

impl StorePool {
    /// 创建新的池适配器
    pub fn new(name: impl Into<String>, namespace: Option<&str>, store: StoreAdapter) -> Self {
        Self {
            name: name.into(),
            namespace: normalize(namespace),
            store,
            scan_batch_size: SCAN_BATCH_SIZE,
        }
    }

    /// 应用通用缓存池
    pub fn application(namespace: Option<&str>, store: StoreAdapter) -> Self {
        Self::new(APP_POOL_NAME, namespace, store)
    }

    /// ORM 查询/结果缓存池
    pub fn result_cache(namespace: Option<&str>, store: StoreAdapter) -> Self {
        Self::new(RESULT_POOL_NAME, namespace, store)
    }

    /// 设置清空时 SCAN 的 COUNT 提示
    pub fn scan_batch_size(mut self, batch_size: usize) -> Self {
        self.scan_batch_size = batch_size.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl NamespaceProvider for StorePool {
    fn root_namespace(&self) -> Option<String> {
        self.namespace.clone()
    }
}

#[async_trait]
impl CachePool for StorePool {
    async fn clear(&self) -> BestEffort<bool> {
        let Some(namespace) = self.namespace.as_deref() else {
            warn!(pool = %self.name, "池未配置命名空间，跳过清空");
            return BestEffort::ok(false);
        };

        // 逐批扫描逐批删除，内存中只保留当前批次
        let pattern = scan_pattern(namespace);
        let executor = DeletionExecutor::new(self.store.clone());
        let mut cursor = Cursor::start();
        let mut deleted = 0u64;
        let mut rounds = 0usize;
        let mut delete_failure = None;

        loop {
            let (page, scan_failure) = self
                .store
                .scan(&cursor, &pattern, self.scan_batch_size)
                .await
                .into_parts();
            rounds += 1;

            if let Some(e) = scan_failure {
                warn!(pool = %self.name, rounds, deleted, "清空时扫描失败: {}", e);
                return BestEffort::degraded(false, e);
            }

            let keys: Vec<String> = page
                .keys
                .into_iter()
                .filter(|key| key.starts_with(namespace))
                .collect();
            if !keys.is_empty() {
                let (count, failure) = executor
                    .execute_in_batches(&keys, CLEAR_DELETE_BATCH_SIZE)
                    .await
                    .into_parts();
                deleted += count;
                if failure.is_some() {
                    delete_failure = failure;
                }
            }

            cursor = page.next;
            if cursor.is_complete() {
                break;
            }
        }

        match delete_failure {
            Some(e) => {
                warn!(pool = %self.name, deleted, "清空未完成: {}", e);
                BestEffort::degraded(false, e)
            }
            None => {
                info!(pool = %self.name, namespace, rounds, deleted, "池已清空");
                BestEffort::ok(true)
            }
        }
    }
}
