//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 尽力而为的结果类型
//!
//! 存储层故障不会向上传播：调用方总能拿到一个可用的值（空列表、0、TTL 哨兵），
//! 同时可以通过 [`BestEffort::failure`] 区分"确实没有数据"和"存储不可达"。

use crate::error::StoreError;

/// 带故障记录的结果
#[derive(Debug, Clone, PartialEq)]
pub struct BestEffort<T> {
    value: T,
    failure: Option<StoreError>,
}

impl<T> BestEffort<T> {
    /// 成功结果
    pub fn ok(value: T) -> Self {
        Self {
            value,
            failure: None,
        }
    }

    /// 降级结果：携带兜底值和故障原因
    pub fn degraded(value: T, failure: StoreError) -> Self {
        Self {
            value,
            failure: Some(failure),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn failure(&self) -> Option<&StoreError> {
        self.failure.as_ref()
    }

    /// 是否发生过降级
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, Option<StoreError>) {
        (self.value, self.failure)
    }

    /// 转换值，保留故障记录
    pub fn map<U, F>(self, f: F) -> BestEffort<U>
    where
        F: FnOnce(T) -> U,
    {
        BestEffort {
            value: f(self.value),
            failure: self.failure,
        }
    }
}

impl<T: Default> BestEffort<T> {
    /// 从 `Result` 构造；失败时使用默认值
    pub fn from_result(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => Self::degraded(T::default(), e),
        }
    }
}
