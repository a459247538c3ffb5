// src/sync_log/model.rs

use serde::{Deserialize, Serialize};

pub const LOG_FILE_NAME: &str = "sync.log.jsonl";
pub const LOG_BACKUP_NAME: &str = "sync.log.jsonl.1";

pub const MAX_LOG_BYTES: u64 = 1024 * 1024;
pub const MAX_LOG_EVENTS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncEventClass {
    /// storage / configuration fault absorbed locally
    SilentDegrade,
    /// duplicate check could not complete; submission allowed anyway
    FailOpen,
    /// user answered a duplicate prompt
    UserDecision,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncEvent {
    pub id: u64,
    pub ts_ms: u64,
    pub class: SyncEventClass,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<String>,
    pub context: String,
    pub msg: String,
}
