//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 日志初始化
//!
//! 安装基于 `EnvFilter` 的控制台订阅者。`RUST_LOG` 优先于传入的默认过滤规则。

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::AdminError;

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 默认过滤规则（如 `info`、`cachewarden=debug`）
    pub filter: String,
    /// 是否输出目标模块
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            with_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Default::default()
        }
    }

    /// 设置是否输出目标模块
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, AdminError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.filter)
                .map_err(|e| AdminError::ConfigError(format!("日志过滤规则无效: {}", e))),
        }
    }
}

/// 初始化全局日志
///
/// 重复初始化时返回错误，不会覆盖已有的订阅者。
pub fn init_logging(config: &LoggingConfig) -> Result<(), AdminError> {
    fmt()
        .with_env_filter(config.env_filter()?)
        .with_target(config.with_target)
        .try_init()
        .map_err(|e| AdminError::ConfigError(format!("日志初始化失败: {}", e)))?;

    info!("日志已初始化, 过滤规则: {}", config.filter);
    Ok(())
}
