//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 存储客户端抽象层
//!
//! 定义远端键值存储的能力接口 [`StoreClient`]，以及在其之上的统一调用面
//! [`StoreAdapter`]。
//!
//! # 特性
//!
//! - **单一实现**: 启动时按配置选定一个后端（内存或 Redis），调用路径上不做类型判断
//! - **回复归一化**: 不同后端的回复统一转换为 [`Reply`]，删除计数只在一处解释
//! - **调用超时**: 每次往返都有独立的超时
//! - **故障吞没**: 传输错误降级为空值或 0，并记录在 [`BestEffort`] 中

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{trace, warn};

use crate::constants::{DEFAULT_CALL_TIMEOUT_MS, SCAN_CURSOR_START, TTL_UNKNOWN};
use crate::error::StoreError;
use crate::outcome::BestEffort;

/// 归一化后的存储回复
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 空回复
    Nil,
    /// 整数回复
    Int(i64),
    /// 文本回复（批量字符串或状态字符串）
    Text(String),
    /// 不是合法 UTF-8 的批量字符串，保留原始字节
    Binary(Vec<u8>),
    /// 数组回复
    Array(Vec<Reply>),
    /// OK 状态
    Okay,
}

impl Reply {
    /// 解释为整数（整数或数字字符串）
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Int(n) => Some(*n),
            Reply::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// 解释为删除计数
    ///
    /// 数字、数字字符串按值计数；空回复、负数及其他无法解释的形态计为 0。
    pub fn as_count(&self) -> u64 {
        match self.as_integer() {
            Some(n) if n > 0 => n as u64,
            _ => 0,
        }
    }
}

/// SCAN 游标
///
/// 不解释其含义，只在调用间往返传递。`"0"` 既是起点也是终点。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// 起始游标
    pub fn start() -> Self {
        Self(SCAN_CURSOR_START.to_string())
    }

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// 从回复中解析游标（整数或字符串）
    pub fn from_reply(reply: &Reply) -> Option<Self> {
        match reply {
            Reply::Int(n) => Some(Self(n.to_string())),
            Reply::Text(s) => Some(Self(s.trim().to_string())),
            _ => None,
        }
    }

    /// 是否为起点/终点哨兵
    pub fn is_complete(&self) -> bool {
        self.0 == SCAN_CURSOR_START
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 单次 SCAN 的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// 下一个游标
    pub next: Cursor,
    /// 本批次的键
    pub keys: Vec<String>,
}

impl ScanPage {
    pub fn new(next: Cursor, keys: Vec<String>) -> Self {
        Self { next, keys }
    }

    /// 解析 `[cursor, [key, ...]]` 形式的两元素回复
    pub fn from_reply(reply: Reply) -> Result<Self, StoreError> {
        let mut parts = match reply {
            Reply::Array(parts) if parts.len() == 2 => parts,
            other => {
                return Err(StoreError::QueryError(format!(
                    "SCAN 回复格式无效: {:?}",
                    other
                )))
            }
        };

        let keys_reply = parts.pop().unwrap_or(Reply::Nil);
        let cursor_reply = parts.pop().unwrap_or(Reply::Nil);

        let next = Cursor::from_reply(&cursor_reply)
            .ok_or_else(|| StoreError::QueryError("SCAN 游标无效".to_string()))?;

        let keys = match keys_reply {
            Reply::Array(items) => {
                let mut keys = Vec::with_capacity(items.len());
                let mut skipped = 0usize;
                for item in items {
                    match item {
                        Reply::Text(key) => keys.push(key),
                        _ => skipped += 1,
                    }
                }
                if skipped > 0 {
                    // 键只能原样往返，无法表示的键不列出也不删除
                    warn!(skipped, "SCAN 批次中有非 UTF-8 键，已忽略");
                }
                keys
            }
            Reply::Nil => Vec::new(),
            other => {
                return Err(StoreError::QueryError(format!(
                    "SCAN 键列表格式无效: {:?}",
                    other
                )))
            }
        };

        Ok(Self { next, keys })
    }
}

/// 存储客户端能力接口
///
/// 每个方法对应一条存储命令，错误原样返回；降级由 [`StoreAdapter`] 负责。
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// `SCAN cursor MATCH pattern COUNT count`
    async fn scan(&self, cursor: &Cursor, pattern: &str, count: usize)
        -> Result<ScanPage, StoreError>;

    /// `TTL key`
    async fn ttl(&self, key: &str) -> Result<Reply, StoreError>;

    /// `UNLINK key...`（非阻塞删除）
    async fn unlink(&self, keys: &[String]) -> Result<Reply, StoreError>;

    /// `DEL key...`（阻塞删除）
    async fn del(&self, keys: &[String]) -> Result<Reply, StoreError>;

    /// 后端名称（用于日志）
    fn backend(&self) -> &'static str;
}

/// 统一调用面
///
/// 对外的方法都不会失败：超时和传输错误被转换为兜底值。
#[derive(Clone)]
pub struct StoreAdapter {
    client: Arc<dyn StoreClient>,
    call_timeout: Duration,
}

impl fmt::Debug for StoreAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreAdapter")
            .field("backend", &self.client.backend())
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

impl StoreAdapter {
    /// 创建新的调用面
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self {
            client,
            call_timeout: Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS),
        }
    }

    /// 设置单次调用超时
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub fn backend(&self) -> &'static str {
        self.client.backend()
    }

    /// 带超时的执行
    async fn call<T, Fut>(&self, command: &'static str, fut: Fut) -> Result<T, StoreError>
    where
        Fut: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::TimeoutError(format!(
                "{} 超过 {:?} 未返回",
                command, self.call_timeout
            ))),
        }
    }

    /// 扫描一批键
    ///
    /// 失败时返回已完成的空批次，调用方的循环会自然结束。
    pub async fn scan(&self, cursor: &Cursor, pattern: &str, count: usize) -> BestEffort<ScanPage> {
        let result = self
            .call("SCAN", self.client.scan(cursor, pattern, count))
            .await;

        if let Err(e) = &result {
            warn!(
                backend = self.backend(),
                cursor = %cursor,
                pattern,
                "SCAN 失败，按空结果处理: {}",
                e
            );
        }

        BestEffort::from_result(result)
    }

    /// 查询剩余存活时间（秒）
    ///
    /// 失败或回复无法解释时返回 [`TTL_UNKNOWN`]。
    pub async fn ttl(&self, key: &str) -> BestEffort<i64> {
        match self.call("TTL", self.client.ttl(key)).await {
            Ok(reply) => match reply.as_integer() {
                Some(ttl) => BestEffort::ok(ttl),
                None => {
                    trace!(key, "TTL 回复无法解释: {:?}", reply);
                    BestEffort::degraded(
                        TTL_UNKNOWN,
                        StoreError::QueryError(format!("TTL 回复无法解释: {:?}", reply)),
                    )
                }
            },
            Err(e) => {
                warn!(backend = self.backend(), key, "TTL 查询失败: {}", e);
                BestEffort::degraded(TTL_UNKNOWN, e)
            }
        }
    }

    /// 非阻塞删除
    pub async fn unlink(&self, keys: &[String]) -> BestEffort<u64> {
        if keys.is_empty() {
            return BestEffort::ok(0);
        }
        let result = self.call("UNLINK", self.client.unlink(keys)).await;
        self.count_reply("UNLINK", keys.len(), result)
    }

    /// 阻塞删除
    pub async fn del(&self, keys: &[String]) -> BestEffort<u64> {
        if keys.is_empty() {
            return BestEffort::ok(0);
        }
        let result = self.call("DEL", self.client.del(keys)).await;
        self.count_reply("DEL", keys.len(), result)
    }

    fn count_reply(
        &self,
        command: &'static str,
        requested: usize,
        result: Result<Reply, StoreError>,
    ) -> BestEffort<u64> {
        match result {
            Ok(reply) => {
                let count = reply.as_count();
                trace!(command, requested, count, "删除命令完成: {:?}", reply);
                BestEffort::ok(count)
            }
            Err(e) => {
                warn!(
                    backend = self.backend(),
                    command, requested, "删除命令失败，按 0 计: {}", e
                );
                BestEffort::degraded(0, e)
            }
        }
    }
}
