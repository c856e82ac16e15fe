//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 内存存储实现
//!
//! 进程内的键值存储，实现与 Redis 相同的 SCAN/TTL/UNLINK/DEL 语义。
//! 用于离线运行和测试。

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::constants::{TTL_MISSING, TTL_NO_EXPIRY};
use crate::error::StoreError;
use crate::store::{Cursor, Reply, ScanPage, StoreClient};

/// 游标形如 `>last_key`，下一批从该键之后继续
const CURSOR_MARKER: char = '>';

/// 内存条目
#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// 内存存储
///
/// 游标为有序键列表中的偏移量，`"0"` 表示起点和终点。
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: DashMap<String, MemoryEntry>,
    unlink_disabled: AtomicBool,
}

impl MemoryStore {
    /// 创建新的内存存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟禁用了 UNLINK 的服务端
    pub fn with_unlink_disabled(self) -> Self {
        self.unlink_disabled.store(true, Ordering::Relaxed);
        self
    }

    /// 写入键（`ttl` 为 `None` 表示永不过期）
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>, ttl: Option<Duration>) {
        self.data.insert(
            key.into(),
            MemoryEntry {
                value: value.into(),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
    }

    /// 读取键值
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.data
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 未过期的键数量
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.data
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live_keys_matching(&self, pattern: &str) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .data
            .iter()
            .filter(|entry| !entry.is_expired(now) && glob_match(pattern, entry.key()))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    fn remove_live(&self, keys: &[String]) -> i64 {
        let now = Instant::now();
        keys.iter()
            .filter_map(|key| self.data.remove(key))
            .filter(|(_, entry)| !entry.is_expired(now))
            .count() as i64
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn scan(
        &self,
        cursor: &Cursor,
        pattern: &str,
        count: usize,
    ) -> Result<ScanPage, StoreError> {
        let keys = self.live_keys_matching(pattern);
        let start = if cursor.is_complete() {
            0
        } else {
            let last = cursor
                .as_str()
                .strip_prefix(CURSOR_MARKER)
                .ok_or_else(|| StoreError::QueryError(format!("无效游标: {}", cursor)))?;
            keys.partition_point(|key| key.as_str() <= last)
        };

        let end = start.saturating_add(count.max(1)).min(keys.len());
        let batch = keys[start..end].to_vec();

        let next = match batch.last() {
            Some(last) if end < keys.len() => Cursor::new(format!("{}{}", CURSOR_MARKER, last)),
            _ => Cursor::start(),
        };

        Ok(ScanPage::new(next, batch))
    }

    async fn ttl(&self, key: &str) -> Result<Reply, StoreError> {
        let now = Instant::now();
        let ttl = match self.data.get(key) {
            None => TTL_MISSING,
            Some(entry) if entry.is_expired(now) => TTL_MISSING,
            Some(entry) => match entry.expires_at {
                None => TTL_NO_EXPIRY,
                Some(at) => {
                    let remaining = at.saturating_duration_since(now).as_millis();
                    ((remaining + 500) / 1000) as i64
                }
            },
        };
        Ok(Reply::Int(ttl))
    }

    async fn unlink(&self, keys: &[String]) -> Result<Reply, StoreError> {
        if self.unlink_disabled.load(Ordering::Relaxed) {
            return Err(StoreError::Unsupported("UNLINK".to_string()));
        }
        Ok(Reply::Int(self.remove_live(keys)))
    }

    async fn del(&self, keys: &[String]) -> Result<Reply, StoreError> {
        Ok(Reply::Int(self.remove_live(keys)))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Redis 风格的 glob 匹配
///
/// 支持 `*`、`?`、`[abc]`、`[^a-z]` 和 `\` 转义。
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_match_chars(&pattern, &text)
}

fn glob_match_chars(pattern: &[char], text: &[char]) -> bool {
    let Some((&head, rest)) = pattern.split_first() else {
        return text.is_empty();
    };

    match head {
        '*' => {
            // 合并连续的 *
            let rest = {
                let skip = rest.iter().take_while(|c| **c == '*').count();
                &rest[skip..]
            };
            if rest.is_empty() {
                return true;
            }
            (0..=text.len()).any(|i| glob_match_chars(rest, &text[i..]))
        }
        '?' => !text.is_empty() && glob_match_chars(rest, &text[1..]),
        '[' => {
            let Some((&c, text_rest)) = text.split_first() else {
                return false;
            };
            match match_class(rest, c) {
                Some((true, after)) => glob_match_chars(after, text_rest),
                Some((false, _)) => false,
                // 未闭合的 [ 按字面量处理
                None => c == '[' && glob_match_chars(rest, text_rest),
            }
        }
        '\\' if !rest.is_empty() => {
            !text.is_empty() && text[0] == rest[0] && glob_match_chars(&rest[1..], &text[1..])
        }
        literal => !text.is_empty() && text[0] == literal && glob_match_chars(rest, &text[1..]),
    }
}

/// 匹配字符类，返回是否命中以及类之后的剩余模式
fn match_class(class: &[char], c: char) -> Option<(bool, &[char])> {
    let (negated, mut i) = match class.first() {
        Some('^') => (true, 1),
        _ => (false, 0),
    };

    let mut matched = false;
    let mut first = true;
    while i < class.len() {
        let current = class[i];
        if current == ']' && !first {
            return Some((matched != negated, &class[i + 1..]));
        }
        first = false;

        if current == '\\' && i + 1 < class.len() {
            matched |= class[i + 1] == c;
            i += 2;
        } else if i + 2 < class.len() && class[i + 1] == '-' && class[i + 2] != ']' {
            let (lo, hi) = if current <= class[i + 2] {
                (current, class[i + 2])
            } else {
                (class[i + 2], current)
            };
            matched |= lo <= c && c <= hi;
            i += 3;
        } else {
            matched |= current == c;
            i += 1;
        }
    }

    None
}
