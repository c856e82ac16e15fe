//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 命名空间解析
//!
//! 池的私有键前缀只通过 [`NamespaceProvider`] 获取。更换底层池实现时只需要
//! 更新对应的 provider 实现。

use crate::pool::NamespaceProvider;

/// 解析池的根命名空间
///
/// 空字符串或纯空白视为未解析。
pub fn resolve(provider: &dyn NamespaceProvider) -> Option<String> {
    normalize(provider.root_namespace().as_deref())
}

/// 归一化命名空间
pub fn normalize(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|ns| !ns.is_empty())
        .map(str::to_string)
}

/// 转义 glob 元字符，使命名空间在 `MATCH` 中按字面量匹配
pub fn escape_glob(namespace: &str) -> String {
    let mut escaped = String::with_capacity(namespace.len());
    for c in namespace.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 构造扫描模式 `namespace*`
pub fn scan_pattern(namespace: &str) -> String {
    format!("{}*", escape_glob(namespace))
}
