//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Redis客户端封装
//!
//! 基于 `ConnectionManager` 的 [`StoreClient`] 实现，断线后自动重连。
//! 所有命令以原始命令形式发出，回复统一转换为 [`Reply`]。

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client, IntoConnectionInfo, Value};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::constants::DEFAULT_CONNECT_TIMEOUT_MS;
use crate::error::StoreError;
use crate::store::{Cursor, Reply, ScanPage, StoreClient};

/// Redis配置
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis连接URL
    pub url: String,
    /// 数据库索引
    pub db: i64,
    /// 密码（使用 Secret 包装以防止意外泄露）
    pub password: Option<Secret<String>>,
    /// 连接超时（毫秒）
    pub connect_timeout_ms: u64,
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("url", &self.url)
            .field("db", &self.db)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .finish()
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            db: 0,
            password: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

impl RedisConfig {
    /// 创建新的Redis配置
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// 设置数据库索引
    pub fn db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    /// 设置密码
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Secret::new(password.into()));
        self
    }

    /// 设置连接超时
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = timeout.as_millis() as u64;
        self
    }
}

/// Redis存储客户端
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

impl RedisStore {
    /// 建立连接
    pub async fn connect(config: &RedisConfig) -> Result<Self, StoreError> {
        info!("连接Redis, URL: {}, db: {}", config.url, config.db);

        let mut info = config.url.as_str().into_connection_info().map_err(|e| {
            error!("解析Redis URL失败: {}", e);
            StoreError::ConnectionError(format!("解析Redis URL失败: {}", e))
        })?;
        info.redis.db = config.db;
        if let Some(password) = &config.password {
            info.redis.password = Some(password.expose_secret().clone());
        }

        let client = Client::open(info).map_err(|e| {
            error!("创建Redis客户端失败: {}", e);
            StoreError::ConnectionError(format!("创建Redis客户端失败: {}", e))
        })?;

        let timeout = Duration::from_millis(config.connect_timeout_ms);
        let conn = match tokio::time::timeout(timeout, ConnectionManager::new(client)).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => {
                error!("创建Redis连接管理器失败: {}", e);
                return Err(StoreError::ConnectionError(format!(
                    "创建Redis连接管理器失败: {}",
                    e
                )));
            }
            Err(_) => {
                error!("Redis连接超时: {:?}", timeout);
                return Err(StoreError::TimeoutError(format!(
                    "Redis连接超过 {:?}",
                    timeout
                )));
            }
        };

        info!("Redis连接建立成功");
        Ok(Self { conn })
    }

    async fn query(&self, cmd: &redis::Cmd) -> Result<Reply, StoreError> {
        let mut conn = self.conn.clone();
        let value: Value = cmd.query_async(&mut conn).await?;
        Ok(to_reply(value))
    }
}

#[async_trait]
impl StoreClient for RedisStore {
    async fn scan(
        &self,
        cursor: &Cursor,
        pattern: &str,
        count: usize,
    ) -> Result<ScanPage, StoreError> {
        let mut cmd = redis::cmd("SCAN");
        cmd.arg(cursor.as_str())
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count);

        let page = ScanPage::from_reply(self.query(&cmd).await?)?;
        debug!(
            cursor = %cursor,
            next = %page.next,
            batch = page.keys.len(),
            "Redis SCAN"
        );
        Ok(page)
    }

    async fn ttl(&self, key: &str) -> Result<Reply, StoreError> {
        let mut cmd = redis::cmd("TTL");
        cmd.arg(key);
        self.query(&cmd).await
    }

    async fn unlink(&self, keys: &[String]) -> Result<Reply, StoreError> {
        let mut cmd = redis::cmd("UNLINK");
        cmd.arg(keys);
        self.query(&cmd).await
    }

    async fn del(&self, keys: &[String]) -> Result<Reply, StoreError> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(keys);
        self.query(&cmd).await
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

/// 将 Redis 回复转换为归一化回复
fn to_reply(value: Value) -> Reply {
    match value {
        Value::Nil => Reply::Nil,
        Value::Int(n) => Reply::Int(n),
        Value::Data(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Reply::Text(text),
            Err(e) => Reply::Binary(e.into_bytes()),
        },
        Value::Bulk(items) => Reply::Array(items.into_iter().map(to_reply).collect()),
        Value::Status(status) => Reply::Text(status),
        Value::Okay => Reply::Okay,
    }
}
