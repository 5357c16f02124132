//! インメモリ SharedStore 実装
//!
//! Redis なしでの起動（ローカル開発）とユニットテストのための実装。
//! リスト・セット・ソート済みセット・TTL のセマンティクスを Redis と
//! 同じ観測可能な振る舞いで再現します。TTL はクロック注入により
//! テストから時間を進めて検証できます。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use hiroba_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{BatchCommand, SharedStore, StoreBatch, StoreError};

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    List(Vec<String>),
    Set(HashSet<String>),
    ZSet(HashMap<String, f64>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    /// Unix ミリ秒。`None` なら無期限
    expires_at: Option<i64>,
}

/// インメモリストア
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl InMemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn wrong_type() -> StoreError {
        StoreError::Connection(
            "WRONGTYPE operation against a key holding the wrong kind of value".to_string(),
        )
    }

    /// 期限切れのエントリを取り除いた上でマップへの参照を返す
    fn purge_expired(&self, entries: &mut HashMap<String, Entry>, key: &str) {
        let now = self.clock.now_utc_millis();
        if let Some(entry) = entries.get(key) {
            if let Some(expires_at) = entry.expires_at {
                if expires_at <= now {
                    entries.remove(key);
                }
            }
        }
    }

    fn apply(&self, entries: &mut HashMap<String, Entry>, command: &BatchCommand) -> Result<(), StoreError> {
        match command {
            BatchCommand::LPush { key, value } => self.do_lpush(entries, key, value),
            BatchCommand::LTrim { key, start, stop } => self.do_ltrim(entries, key, *start, *stop),
            BatchCommand::Expire { key, seconds } => {
                self.do_expire(entries, key, *seconds);
                Ok(())
            }
            BatchCommand::Incr { key } => self.do_incr(entries, key).map(|_| ()),
            BatchCommand::SAdd { key, member } => self.do_sadd(entries, key, member),
            BatchCommand::ZIncrBy { key, delta, member } => {
                self.do_zincrby(entries, key, *delta, member)
            }
        }
    }

    fn do_lpush(
        &self,
        entries: &mut HashMap<String, Entry>,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.purge_expired(entries, key);
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::List(Vec::new()),
            expires_at: None,
        });
        match &mut entry.value {
            Value::List(list) => {
                list.insert(0, value.to_string());
                Ok(())
            }
            _ => Err(Self::wrong_type()),
        }
    }

    fn do_ltrim(
        &self,
        entries: &mut HashMap<String, Entry>,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<(), StoreError> {
        self.purge_expired(entries, key);
        let Some(entry) = entries.get_mut(key) else {
            return Ok(());
        };
        match &mut entry.value {
            Value::List(list) => {
                let (start, stop) = normalize_range(start, stop, list.len());
                if start > stop {
                    list.clear();
                } else {
                    *list = list[start..=stop].to_vec();
                }
                Ok(())
            }
            _ => Err(Self::wrong_type()),
        }
    }

    fn do_expire(&self, entries: &mut HashMap<String, Entry>, key: &str, seconds: i64) {
        self.purge_expired(entries, key);
        let now = self.clock.now_utc_millis();
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(now + seconds * 1000);
        }
    }

    fn do_incr(&self, entries: &mut HashMap<String, Entry>, key: &str) -> Result<i64, StoreError> {
        self.purge_expired(entries, key);
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::Str("0".to_string()),
            expires_at: None,
        });
        match &mut entry.value {
            Value::Str(current) => {
                let parsed: i64 = current
                    .parse()
                    .map_err(|_| StoreError::Connection("value is not an integer".to_string()))?;
                let next = parsed + 1;
                *current = next.to_string();
                Ok(next)
            }
            _ => Err(Self::wrong_type()),
        }
    }

    fn do_sadd(
        &self,
        entries: &mut HashMap<String, Entry>,
        key: &str,
        member: &str,
    ) -> Result<(), StoreError> {
        self.purge_expired(entries, key);
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::Set(HashSet::new()),
            expires_at: None,
        });
        match &mut entry.value {
            Value::Set(set) => {
                set.insert(member.to_string());
                Ok(())
            }
            _ => Err(Self::wrong_type()),
        }
    }

    fn do_zincrby(
        &self,
        entries: &mut HashMap<String, Entry>,
        key: &str,
        delta: f64,
        member: &str,
    ) -> Result<(), StoreError> {
        self.purge_expired(entries, key);
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::ZSet(HashMap::new()),
            expires_at: None,
        });
        match &mut entry.value {
            Value::ZSet(zset) => {
                *zset.entry(member.to_string()).or_insert(0.0) += delta;
                Ok(())
            }
            _ => Err(Self::wrong_type()),
        }
    }
}

/// Redis 流の範囲指定（負のインデックス、両端含む）を正規化する
fn normalize_range(start: isize, stop: isize, len: usize) -> (usize, usize) {
    let len = len as isize;
    let mut start = if start < 0 { len + start } else { start };
    let mut stop = if stop < 0 { len + stop } else { stop };
    if start < 0 {
        start = 0;
    }
    if stop >= len {
        stop = len - 1;
    }
    if len == 0 || stop < 0 {
        return (1, 0); // 空レンジ
    }
    (start as usize, stop as usize)
}

#[async_trait]
impl SharedStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().await;
        self.purge_expired(&mut entries, key);
        match entries.get(key) {
            Some(Entry {
                value: Value::Str(value),
                ..
            }) => Ok(Some(value.clone())),
            Some(_) => Err(Self::wrong_type()),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let expires_at =
            ttl_secs.map(|ttl| self.clock.now_utc_millis() + (ttl as i64) * 1000);
        entries.insert(
            key.to_string(),
            Entry {
                value: Value::Str(value.to_string()),
                expires_at,
            },
        );
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        Ok(())
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        self.do_lpush(&mut entries, key, value)
    }

    async fn lrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, StoreError> {
        let mut entries = self.entries.lock().await;
        self.purge_expired(&mut entries, key);
        match entries.get(key) {
            Some(Entry {
                value: Value::List(list),
                ..
            }) => {
                let (start, stop) = normalize_range(start, stop, list.len());
                if start > stop {
                    Ok(Vec::new())
                } else {
                    Ok(list[start..=stop].to_vec())
                }
            }
            Some(_) => Err(Self::wrong_type()),
            None => Ok(Vec::new()),
        }
    }

    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        self.do_ltrim(&mut entries, key, start, stop)
    }

    async fn expire(&self, key: &str, seconds: i64) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        self.do_expire(&mut entries, key, seconds);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut entries = self.entries.lock().await;
        self.do_incr(&mut entries, key)
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        self.do_sadd(&mut entries, key, member)
    }

    async fn scard(&self, key: &str) -> Result<i64, StoreError> {
        let mut entries = self.entries.lock().await;
        self.purge_expired(&mut entries, key);
        match entries.get(key) {
            Some(Entry {
                value: Value::Set(set),
                ..
            }) => Ok(set.len() as i64),
            Some(_) => Err(Self::wrong_type()),
            None => Ok(0),
        }
    }

    async fn zincrby(&self, key: &str, delta: f64, member: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        self.do_zincrby(&mut entries, key, delta, member)
    }

    async fn zrevrange_withscores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<(String, f64)>, StoreError> {
        let mut entries = self.entries.lock().await;
        self.purge_expired(&mut entries, key);
        match entries.get(key) {
            Some(Entry {
                value: Value::ZSet(zset),
                ..
            }) => {
                let mut members: Vec<(String, f64)> =
                    zset.iter().map(|(m, s)| (m.clone(), *s)).collect();
                // スコア降順、同点はメンバーの逆辞書順（Redis の ZREVRANGE と同じ）
                members.sort_by(|a, b| {
                    b.1.partial_cmp(&a.1)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| b.0.cmp(&a.0))
                });
                let (start, stop) = normalize_range(start, stop, members.len());
                if start > stop {
                    Ok(Vec::new())
                } else {
                    Ok(members[start..=stop].to_vec())
                }
            }
            Some(_) => Err(Self::wrong_type()),
            None => Ok(Vec::new()),
        }
    }

    async fn submit(&self, batch: StoreBatch) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        for command in batch.commands() {
            self.apply(&mut entries, command)?;
        }
        Ok(())
    }
}
