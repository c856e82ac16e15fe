//! 测试通用工具模块
//!
//! 提供脚本化的存储替身和常用的引擎构造函数。

#![allow(dead_code)]

use async_trait::async_trait;
use cachewarden::prelude::*;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 脚本化存储替身
///
/// SCAN 按预设批次依次返回（游标为批次序号），TTL/UNLINK/DEL 返回预设回复，
/// 并记录每次调用。
#[derive(Default)]
pub struct ScriptedStore {
    pages: Vec<Vec<String>>,
    endless_prefix: Option<String>,
    scan_failure_at: Option<usize>,
    ttls: HashMap<String, Reply>,
    hang_ttl: bool,
    unlink_reply: Option<Result<Reply, StoreError>>,
    del_reply: Option<Result<Reply, StoreError>>,
    scan_calls: AtomicUsize,
    unlink_calls: Mutex<Vec<Vec<String>>>,
    del_calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个 SCAN 批次
    pub fn page(mut self, keys: &[&str]) -> Self {
        self.pages.push(keys.iter().map(|k| k.to_string()).collect());
        self
    }

    /// 游标永不归零，每批生成新键
    pub fn endless(mut self, prefix: &str) -> Self {
        self.endless_prefix = Some(prefix.to_string());
        self
    }

    /// 第 `call` 次 SCAN（从 0 计）返回连接错误
    pub fn fail_scan_at(mut self, call: usize) -> Self {
        self.scan_failure_at = Some(call);
        self
    }

    pub fn ttl(mut self, key: &str, reply: Reply) -> Self {
        self.ttls.insert(key.to_string(), reply);
        self
    }

    /// TTL 调用永不返回
    pub fn hang_ttl(mut self) -> Self {
        self.hang_ttl = true;
        self
    }

    pub fn unlink_reply(mut self, reply: Result<Reply, StoreError>) -> Self {
        self.unlink_reply = Some(reply);
        self
    }

    pub fn del_reply(mut self, reply: Result<Reply, StoreError>) -> Self {
        self.del_reply = Some(reply);
        self
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub fn unlink_calls(&self) -> Vec<Vec<String>> {
        self.unlink_calls.lock().clone()
    }

    pub fn del_calls(&self) -> Vec<Vec<String>> {
        self.del_calls.lock().clone()
    }
}

#[async_trait]
impl StoreClient for ScriptedStore {
    async fn scan(
        &self,
        cursor: &Cursor,
        pattern: &str,
        count: usize,
    ) -> Result<ScanPage, StoreError> {
        let call = self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if self.scan_failure_at == Some(call) {
            return Err(StoreError::ConnectionError("connection reset".to_string()));
        }

        let index: usize = cursor.as_str().parse().unwrap();

        if let Some(prefix) = &self.endless_prefix {
            let keys = (0..count)
                .map(|j| format!("{}{:08}", prefix, index * count + j))
                .collect();
            return Ok(ScanPage::new(Cursor::new((index + 1).to_string()), keys));
        }

        let prefix = pattern.trim_end_matches('*');
        let keys = self
            .pages
            .get(index)
            .map(|page| {
                page.iter()
                    .filter(|k| k.starts_with(prefix))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let next = if index + 1 >= self.pages.len() {
            Cursor::start()
        } else {
            Cursor::new((index + 1).to_string())
        };
        Ok(ScanPage::new(next, keys))
    }

    async fn ttl(&self, key: &str) -> Result<Reply, StoreError> {
        if self.hang_ttl {
            std::future::pending::<()>().await;
        }
        Ok(self.ttls.get(key).cloned().unwrap_or(Reply::Int(-2)))
    }

    async fn unlink(&self, keys: &[String]) -> Result<Reply, StoreError> {
        self.unlink_calls.lock().push(keys.to_vec());
        self.unlink_reply
            .clone()
            .unwrap_or(Ok(Reply::Int(keys.len() as i64)))
    }

    async fn del(&self, keys: &[String]) -> Result<Reply, StoreError> {
        self.del_calls.lock().push(keys.to_vec());
        self.del_reply
            .clone()
            .unwrap_or(Ok(Reply::Int(keys.len() as i64)))
    }

    fn backend(&self) -> &'static str {
        "scripted"
    }
}

/// 应用池 `app:v1:` 与未解析命名空间的 ORM 池
pub fn default_pools() -> Vec<PoolConfig> {
    vec![
        PoolConfig::new("cache.app", "Application cache").namespace("app:v1:"),
        PoolConfig::new("result_cache", "ORM result cache"),
    ]
}

/// 在给定存储上构造引擎
pub fn admin_over(client: Arc<dyn StoreClient>, pools: &[PoolConfig]) -> CacheAdmin {
    admin_with_scan(client, pools, ScanConfig::default())
}

pub fn admin_with_scan(
    client: Arc<dyn StoreClient>,
    pools: &[PoolConfig],
    scan: ScanConfig,
) -> CacheAdmin {
    let store = StoreAdapter::new(client).with_call_timeout(Duration::from_millis(200));
    let registry = PoolRegistry::from_config(pools, &store, scan.batch_size);
    CacheAdmin::new(store, registry, &scan)
}

/// 预置 `app:v1:a`（ttl 30）、`app:v1:b`（不过期）和外部键 `other:x`
pub fn seeded_memory_store() -> Arc<MemoryStore> {
    let memory = Arc::new(MemoryStore::new());
    memory.insert("app:v1:a", "1", Some(Duration::from_secs(30)));
    memory.insert("app:v1:b", "1", None);
    memory.insert("other:x", "1", None);
    memory
}
