// src/platform/noop.rs

use crate::platform::BestEffortFailure;
use std::path::Path;

// Permissions and dir fsync are unix-only.

pub fn restrict_dir_perms_best_effort(_path: &Path) -> Option<BestEffortFailure> {
    None
}

pub fn restrict_file_perms_best_effort(_path: &Path) -> Option<BestEffortFailure> {
    None
}

pub fn fsync_dir_best_effort(_dir: &Path) -> Option<BestEffortFailure> {
    None
}
