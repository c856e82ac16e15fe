//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 展示键转换
//!
//! 去掉池命名空间以及紧随其后的版本段，得到应用其余部分认识的键名。

/// 从原始键推导展示键
///
/// - 原始键不以 `namespace` 开头：原样返回
/// - 去掉命名空间后为空：原样返回
/// - 剩余部分含有 `:`：去掉第一个 `:` 及其之前的段
/// - 否则返回剩余部分：命名空间后只剩一个段时展示该段本身
///   （`app:v1:` 下的 `app:v1:a` 展示为 `a`），而不是原始键
///
/// ```
/// use cachewarden::display::display_key;
///
/// assert_eq!(display_key("app:", "app:v3:user:42"), "user:42");
/// assert_eq!(display_key("app:v1:", "app:v1:a"), "a");
/// assert_eq!(display_key("app:", "other:x"), "other:x");
/// ```
pub fn display_key<'a>(namespace: &str, raw_key: &'a str) -> &'a str {
    if namespace.is_empty() {
        return raw_key;
    }

    let Some(rest) = raw_key.strip_prefix(namespace) else {
        return raw_key;
    };

    if rest.is_empty() {
        return raw_key;
    }

    match rest.split_once(':') {
        Some((_, identifier)) if !identifier.is_empty() => identifier,
        Some(_) => raw_key,
        None => rest,
    }
}
