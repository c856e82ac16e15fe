//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 配置模块
//!
//! 定义缓存管理引擎的配置结构，支持 YAML 与 TOML 两种格式。

use ahash::AHashSet as HashSet;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::constants::{
    APP_POOL_LABEL, APP_POOL_NAME, DEFAULT_CALL_TIMEOUT_MS, DEFAULT_TTL_CONCURRENCY,
    MAX_KEYS_PER_POOL, RESULT_POOL_LABEL, RESULT_POOL_NAME, SCAN_BATCH_SIZE,
};
use crate::error::AdminError;
use crate::memory_store::MemoryStore;
use crate::store::StoreClient;

/// 缓存管理配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// 存储后端
    pub store: StoreConfig,
    /// 受管池（按展示顺序）
    pub pools: Vec<PoolConfig>,
    /// 扫描参数
    pub scan: ScanConfig,
    /// 单次存储调用超时（毫秒）
    pub call_timeout_ms: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            pools: PoolConfig::defaults(),
            scan: ScanConfig::default(),
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
        }
    }
}

impl AdminConfig {
    /// 从 YAML 字符串加载
    pub fn from_yaml_str(content: &str) -> Result<Self, AdminError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 字符串加载
    pub fn from_toml_str(content: &str) -> Result<Self, AdminError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载（按扩展名选择格式）
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AdminError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            other => {
                return Err(AdminError::ConfigError(format!(
                    "不支持的配置文件格式: {:?}",
                    other
                )))
            }
        };

        info!("已加载配置: {}, 池数量: {}", path.display(), config.pools.len());
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), AdminError> {
        let mut names = HashSet::new();
        for (index, pool) in self.pools.iter().enumerate() {
            if pool.name.trim().is_empty() {
                return Err(AdminError::ConfigError(format!("池[{}]名称不能为空", index)));
            }
            if !names.insert(pool.name.as_str()) {
                return Err(AdminError::ConfigError(format!("池名称重复: {}", pool.name)));
            }
        }

        self.scan.validate()?;

        if self.call_timeout_ms == 0 {
            return Err(AdminError::ConfigError("调用超时必须大于0".to_string()));
        }

        Ok(())
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

/// 存储后端配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// 进程内存储
    #[default]
    Memory,
    /// Redis
    #[cfg(feature = "redis")]
    Redis(crate::redis_store::RedisConfig),
}

impl StoreConfig {
    /// 按配置建立存储客户端
    pub async fn connect(&self) -> Result<Arc<dyn StoreClient>, AdminError> {
        match self {
            StoreConfig::Memory => {
                info!("使用内存存储");
                Ok(Arc::new(MemoryStore::new()))
            }
            #[cfg(feature = "redis")]
            StoreConfig::Redis(redis) => {
                let store = crate::redis_store::RedisStore::connect(redis).await?;
                Ok(Arc::new(store))
            }
        }
    }
}

/// 池配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolConfig {
    /// 逻辑名称
    pub name: String,
    /// 展示名称
    #[serde(default)]
    pub label: String,
    /// 根命名空间（未配置时池仍会列出，但不参与扫描和删除）
    #[serde(default)]
    pub namespace: Option<String>,
}

impl PoolConfig {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            namespace: None,
        }
    }

    /// 设置命名空间
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// 展示名称，缺省时使用逻辑名称
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.name
        } else {
            &self.label
        }
    }

    /// 应用通用池与 ORM 结果池
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(APP_POOL_NAME, APP_POOL_LABEL),
            Self::new(RESULT_POOL_NAME, RESULT_POOL_LABEL),
        ]
    }
}

/// 扫描配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 每个池最多列出的键数
    pub max_keys_per_pool: usize,
    /// SCAN 的 COUNT 提示
    pub batch_size: usize,
    /// 同时在途的 TTL 查询数
    pub ttl_concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_keys_per_pool: MAX_KEYS_PER_POOL,
            batch_size: SCAN_BATCH_SIZE,
            ttl_concurrency: DEFAULT_TTL_CONCURRENCY,
        }
    }
}

impl ScanConfig {
    /// 校验扫描配置
    pub fn validate(&self) -> Result<(), AdminError> {
        if self.max_keys_per_pool == 0 {
            return Err(AdminError::ConfigError("max_keys_per_pool必须大于0".to_string()));
        }
        if self.batch_size == 0 {
            return Err(AdminError::ConfigError("batch_size必须大于0".to_string()));
        }
        if self.ttl_concurrency == 0 {
            return Err(AdminError::ConfigError("ttl_concurrency必须大于0".to_string()));
        }
        Ok(())
    }
}
