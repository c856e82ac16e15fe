//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 池注册表
//!
//! 应用自身管理的缓存池的静态目录。只包含本应用的池，而不是存储中可能存在的任意池。

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::PoolConfig;
use crate::namespace;
use crate::pool::{CachePool, StorePool};
use crate::store::StoreAdapter;

/// 可供选择的池
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolChoice {
    pub name: String,
    pub label: String,
}

/// 注册表条目
#[derive(Clone)]
pub struct PoolEntry {
    name: String,
    label: String,
    pool: Arc<dyn CachePool>,
}

impl fmt::Debug for PoolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolEntry")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("namespace", &self.namespace())
            .finish()
    }
}

impl PoolEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pool(&self) -> &Arc<dyn CachePool> {
        &self.pool
    }

    /// 解析后的命名空间（每次调用重新解析）
    pub fn namespace(&self) -> Option<String> {
        namespace::resolve(self.pool.as_ref())
    }
}

/// 池注册表
#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    entries: Vec<PoolEntry>,
}

impl PoolRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册池；同名池会被替换，保持原位置
    pub fn register(
        mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        pool: Arc<dyn CachePool>,
    ) -> Self {
        let entry = PoolEntry {
            name: name.into(),
            label: label.into(),
            pool,
        };

        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// 按配置构造注册表，所有池共享同一个存储
    pub fn from_config(pools: &[PoolConfig], store: &StoreAdapter, scan_batch_size: usize) -> Self {
        pools.iter().fold(Self::new(), |registry, config| {
            let pool = StorePool::new(&config.name, config.namespace.as_deref(), store.clone())
                .scan_batch_size(scan_batch_size);
            registry.register(&config.name, config.display_label(), Arc::new(pool))
        })
    }

    /// 所有条目（按注册顺序）
    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PoolEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// 可选池列表（未解析命名空间的池也会列出）
    pub fn choices(&self) -> Vec<PoolChoice> {
        self.entries
            .iter()
            .map(|e| PoolChoice {
                name: e.name.clone(),
                label: e.label.clone(),
            })
            .collect()
    }

    /// 选择池
    ///
    /// 指定了已知名称时只返回该池；未指定或名称未知时返回全部池。
    pub fn select(&self, name: Option<&str>) -> Vec<&PoolEntry> {
        let requested = name.map(str::trim).filter(|n| !n.is_empty());

        if let Some(requested) = requested {
            if let Some(entry) = self.get(requested) {
                return vec![entry];
            }
            debug!(pool = requested, "未知池名称，按全部池处理");
        }

        self.entries.iter().collect()
    }

    /// 所有已解析的受管命名空间
    pub fn managed_namespaces(&self) -> Vec<String> {
        self.entries.iter().filter_map(PoolEntry::namespace).collect()
    }
}
