// src/sync_log/api.rs

use crate::error::AppError;
use crate::types::AppState;

use super::model::{SyncEvent, SyncEventClass};

pub fn record_silent_degrade(state: &AppState, context: &str, panel: Option<&str>, err: &AppError) {
    record(
        state,
        SyncEventClass::SilentDegrade,
        degrade_kind(err),
        panel,
        context,
        &err.to_string(),
    );
}

pub fn record_fail_open(state: &AppState, panel: &str, err: &AppError) {
    record(
        state,
        SyncEventClass::FailOpen,
        "exists_check_failed",
        Some(panel),
        "submit_new_record",
        &err.to_string(),
    );
}

pub fn record_user_decision(state: &AppState, panel: &str, kind: &str, msg: &str) {
    record(
        state,
        SyncEventClass::UserDecision,
        kind,
        Some(panel),
        "submit_new_record",
        msg,
    );
}

pub fn take_degrade_warn_pending(state: &AppState) -> bool {
    match state.sync_log.lock() {
        Ok(mut slog) => slog.take_degrade_warn_pending(),
        Err(_) => false,
    }
}

pub fn recent_events(state: &AppState) -> Vec<SyncEvent> {
    match state.sync_log.lock() {
        Ok(slog) => slog.recent(),
        Err(_) => Vec::new(),
    }
}

fn record(
    state: &AppState,
    class: SyncEventClass,
    kind: &str,
    panel: Option<&str>,
    context: &str,
    msg: &str,
) {
    let mut slog = match state.sync_log.lock() {
        Ok(g) => g,
        Err(_) => return,
    };

    slog.record(class, kind, panel, context, msg);
}

fn degrade_kind(err: &AppError) -> &'static str {
    use AppError::*;

    match err {
        StoreInvalidJson(_) | StoreShapeInvalid(_) | StoreTooLarge { .. } => "store_corrupt",
        StoreReadFailed(_) | Io(_) => "store_read_failed",
        StoreQuotaExceeded { .. } => "store_quota_exceeded",
        StoreWriteFailed(_) | StoreSyncFailed(_) | StoreRenameFailed(_) => "store_write_failed",
        UnknownPanel(_)
        | UnknownField { .. }
        | UnknownOption { .. }
        | FieldKindMismatch { .. }
        | CopySourceNotConfigured(_) => "config_skip",
        StateLockPoisoned => "state_lock_poisoned",
        _ => "other",
    }
}
