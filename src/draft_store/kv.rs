// src/draft_store/kv.rs

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Narrow durable key/value interface over structured JSON values.
///
/// `get` returns `Ok(None)` for an absent key and an error for an entry that
/// exists but cannot be decoded; callers decide whether that is fatal.
pub trait KvStore: Send {
    fn get(&self, key: &str) -> AppResult<Option<Value>>;
    fn set(&mut self, key: &str, value: &Value) -> AppResult<()>;
}

/// In-memory store with an optional byte quota, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes fail once the total serialized size would exceed `max` bytes.
    pub fn with_quota(max: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(max),
        }
    }

    /// Store raw text under `key`, bypassing JSON encoding.
    pub fn insert_raw(&mut self, key: &str, text: &str) {
        self.entries.insert(key.to_string(), text.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> AppResult<Option<Value>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(text) => serde_json::from_str(text)
                .map(Some)
                .map_err(|e| AppError::StoreInvalidJson(e.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: &Value) -> AppResult<()> {
        let text = serde_json::to_string(value)
            .map_err(|e| AppError::StoreWriteFailed(e.to_string()))?;

        if let Some(max) = self.quota_bytes {
            let bytes = self.used_bytes_excluding(key) + key.len() + text.len();
            if bytes > max {
                return Err(AppError::StoreQuotaExceeded { bytes, max });
            }
        }

        self.entries.insert(key.to_string(), text);
        Ok(())
    }
}
