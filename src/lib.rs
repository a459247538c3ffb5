// src/lib.rs

pub mod command;
pub mod command_state;
pub mod context;
pub mod draft_store;
pub mod error;
pub mod exists;
pub mod json_canon;
pub mod panel;
pub mod platform;
pub mod sync_log;
pub mod types;

use crate::draft_store::{FileKv, KvStore};
use crate::error::AppResult;
use crate::sync_log::SyncLog;
use crate::types::AppState;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Mutex;

/// File-backed state under `app_data_dir`, with drafts in `<app_data>/drafts`.
pub fn init_state(app_data_dir: &Path) -> AppResult<AppState> {
    std::fs::create_dir_all(app_data_dir)?;

    let store = FileKv::open(&app_data_dir.join(context::DRAFTS_DIR))?;
    init_state_with_store(app_data_dir, Box::new(store))
}

/// Builds state over `store` and loads drafts and last-accepted fingerprints.
/// Absent or corrupt entries load as empty.
pub fn init_state_with_store(app_data_dir: &Path, store: Box<dyn KvStore>) -> AppResult<AppState> {
    std::fs::create_dir_all(app_data_dir)?;

    let sync_log = SyncLog::init(app_data_dir)?;

    let state = AppState {
        store: Mutex::new(store),
        drafts: Mutex::new(BTreeMap::new()),
        last_accepted: Mutex::new(BTreeMap::new()),
        in_flight: Mutex::new(BTreeSet::new()),
        sync_log: Mutex::new(sync_log),
    };

    command::load(&state);

    Ok(state)
}

impl AppState {
    pub fn new_for_tests(app_data_dir: &Path, store: Box<dyn KvStore>) -> AppResult<Self> {
        crate::init_state_with_store(app_data_dir, store)
    }
}
