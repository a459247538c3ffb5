// src/sync_log/mod.rs

mod api;
mod model;
mod store;

pub use api::{
    recent_events, record_fail_open, record_silent_degrade, record_user_decision,
    take_degrade_warn_pending,
};

pub use model::{SyncEvent, SyncEventClass};

pub use store::SyncLog;
