// src/platform/unix.rs

use crate::platform::BestEffortFailure;
use std::fs::{self, OpenOptions};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

pub fn restrict_dir_perms_best_effort(path: &Path) -> Option<BestEffortFailure> {
    chmod_best_effort(
        path,
        0o700,
        "unix_chmod_dir_failed",
        "chmod 0700 failed for app data dir",
    )
}

pub fn restrict_file_perms_best_effort(path: &Path) -> Option<BestEffortFailure> {
    chmod_best_effort(
        path,
        0o600,
        "unix_chmod_file_failed",
        "chmod 0600 failed for draft store file",
    )
}

fn chmod_best_effort(
    path: &Path,
    mode: u32,
    kind: &'static str,
    msg: &'static str,
) -> Option<BestEffortFailure> {
    match fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        Ok(()) => None,
        Err(e) => Some(BestEffortFailure {
            kind,
            errno: e.raw_os_error(),
            msg,
        }),
    }
}

pub fn fsync_dir_best_effort(dir: &Path) -> Option<BestEffortFailure> {
    let file = match OpenOptions::new().read(true).open(dir) {
        Ok(f) => f,
        Err(e) => {
            return Some(BestEffortFailure {
                kind: "fsync_dir",
                errno: e.raw_os_error(),
                msg: "Failed to open directory for fsync",
            })
        }
    };

    if let Err(e) = file.sync_all() {
        return Some(BestEffortFailure {
            kind: "fsync_dir",
            errno: e.raw_os_error(),
            msg: "Directory fsync failed",
        });
    }

    None
}
