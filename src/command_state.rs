// src/command_state.rs

use crate::{
    draft_store::{encode_drafts, encode_last_accepted, KvStore, DRAFTS_KEY, LAST_SIG_KEY},
    error::{AppError, AppResult},
    sync_log::record_silent_degrade,
    types::{AppState, LastAccepted, PanelKey, PersistedValues},
};
use std::collections::BTreeSet;
use std::sync::MutexGuard;

// ======================================================
// locking helpers
// ======================================================

pub fn lock_store<'a>(state: &'a AppState) -> AppResult<MutexGuard<'a, Box<dyn KvStore>>> {
    state.store.lock().map_err(|_| AppError::StateLockPoisoned)
}

pub fn lock_drafts<'a>(state: &'a AppState) -> AppResult<MutexGuard<'a, PersistedValues>> {
    state.drafts.lock().map_err(|_| AppError::StateLockPoisoned)
}

pub fn lock_last_accepted<'a>(state: &'a AppState) -> AppResult<MutexGuard<'a, LastAccepted>> {
    state
        .last_accepted
        .lock()
        .map_err(|_| AppError::StateLockPoisoned)
}

pub fn lock_in_flight<'a>(state: &'a AppState) -> AppResult<MutexGuard<'a, BTreeSet<PanelKey>>> {
    state
        .in_flight
        .lock()
        .map_err(|_| AppError::StateLockPoisoned)
}

// ======================================================
// whole-structure writes
// ======================================================

/// Write the full drafts table. The in-memory copy stays authoritative on failure.
pub fn write_drafts(state: &AppState) -> AppResult<()> {
    let value = {
        let drafts = lock_drafts(state)?;
        encode_drafts(&drafts)?
    };

    lock_store(state)?.set(DRAFTS_KEY, &value)
}

pub fn write_last_accepted(state: &AppState) -> AppResult<()> {
    let value = {
        let table = lock_last_accepted(state)?;
        encode_last_accepted(&table)?
    };

    lock_store(state)?.set(LAST_SIG_KEY, &value)
}

pub fn write_drafts_best_effort(state: &AppState, context: &str, panel: Option<&str>) {
    if let Err(e) = write_drafts(state) {
        record_silent_degrade(state, context, panel, &e);
    }
}

pub fn write_last_accepted_best_effort(state: &AppState, context: &str, panel: Option<&str>) {
    if let Err(e) = write_last_accepted(state) {
        record_silent_degrade(state, context, panel, &e);
    }
}

// ======================================================
// Unit Tests
// ======================================================
