// src/platform/mod.rs

use std::path::Path;

#[cfg(unix)]
mod unix;

#[cfg(not(unix))]
mod noop;

#[cfg(unix)]
mod imp {
    pub use super::unix::*;
}

#[cfg(not(unix))]
mod imp {
    pub use super::noop::*;
}

#[derive(Clone, Copy, Debug)]
pub struct BestEffortFailure {
    pub kind: &'static str,
    pub errno: Option<i32>,
    pub msg: &'static str,
}

// -------- filesystem permissions (best-effort) --------

pub fn restrict_dir_perms_best_effort(path: &Path) -> Option<BestEffortFailure> {
    imp::restrict_dir_perms_best_effort(path)
}

pub fn restrict_file_perms_best_effort(path: &Path) -> Option<BestEffortFailure> {
    imp::restrict_file_perms_best_effort(path)
}

// -------- directory fsync (best-effort) --------

pub fn fsync_dir_best_effort(path: &Path) -> Option<BestEffortFailure> {
    imp::fsync_dir_best_effort(path)
}

// -------- atomic rename (replace existing) --------

pub fn rename_replace(from: &Path, to: &Path) -> std::io::Result<()> {
    // std::fs::rename replaces the destination on every supported target
    std::fs::rename(from, to)
}
