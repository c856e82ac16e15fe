//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 错误类型定义
//!
//! 使用thiserror定义所有错误类型。
//!
//! 四个运维操作本身从不返回 `Err`：存储层故障会被降级为空结果并记录在
//! [`BestEffort`](crate::outcome::BestEffort) 中。这里的 [`AdminError`] 只用于构造阶段
//! （加载配置、建立连接）。

use thiserror::Error;

/// 缓存管理错误类型
#[derive(Error, Debug)]
pub enum AdminError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 存储错误
    #[error("存储错误: {0}")]
    StoreError(#[from] StoreError),

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML解析错误
    #[error("YAML解析错误: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML解析错误
    #[error("TOML解析错误: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// 存储错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// 连接错误
    #[error("连接错误: {0}")]
    ConnectionError(String),

    /// 查询错误
    #[error("查询错误: {0}")]
    QueryError(String),

    /// 超时错误
    #[error("超时错误: {0}")]
    TimeoutError(String),

    /// 命令不受支持（例如服务端禁用了 UNLINK）
    #[error("命令不受支持: {0}")]
    Unsupported(String),
}

impl StoreError {
    /// 是否为传输层故障（连接或超时）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            StoreError::ConnectionError(_) | StoreError::TimeoutError(_)
        )
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() {
            return StoreError::TimeoutError(err.to_string());
        }
        if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
            return StoreError::ConnectionError(err.to_string());
        }

        let message = err.to_string();
        if message.to_ascii_lowercase().contains("unknown command") {
            StoreError::Unsupported(message)
        } else {
            StoreError::QueryError(message)
        }
    }
}
