// src/draft_store/fs.rs

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::Value;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use crate::error::{AppError, AppResult};
use crate::platform;

use super::kv::KvStore;

const ENTRY_MAX_BYTES: u64 = 4 * 1024 * 1024;

/// One JSON document per key under a directory, replaced atomically on write.
#[derive(Debug)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub fn open(dir: &Path) -> AppResult<Self> {
        fs::create_dir_all(dir)?;
        let _ = platform::restrict_dir_perms_best_effort(dir);
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, key: &str) -> AppResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    fn set(&mut self, key: &str, value: &Value) -> AppResult<()> {
        let path = self.entry_path(key)?;
        write_json(&path, value)
    }
}

fn validate_key(key: &str) -> AppResult<()> {
    let ok = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if ok {
        Ok(())
    } else {
        Err(AppError::StoreInvalidKey(key.to_string()))
    }
}

pub(crate) fn read_json(path: &Path) -> AppResult<Value> {
    let meta = fs::metadata(path).map_err(|e| AppError::StoreReadFailed(e.to_string()))?;

    let bytes = meta.len();
    if bytes > ENTRY_MAX_BYTES {
        return Err(AppError::StoreTooLarge {
            bytes,
            max: ENTRY_MAX_BYTES,
        });
    }

    let text = fs::read_to_string(path).map_err(|e| AppError::StoreReadFailed(e.to_string()))?;

    serde_json::from_str(&text).map_err(|e| AppError::StoreInvalidJson(e.to_string()))
}

pub(crate) fn write_json(path: &Path, value: &Value) -> AppResult<()> {
    let parent = path
        .parent()
        .ok_or_else(|| AppError::StoreWriteFailed("invalid store path".to_string()))?;

    let json = serde_json::to_vec(value).map_err(|e| AppError::StoreWriteFailed(e.to_string()))?;

    if json.len() as u64 > ENTRY_MAX_BYTES {
        return Err(AppError::StoreTooLarge {
            bytes: json.len() as u64,
            max: ENTRY_MAX_BYTES,
        });
    }

    let mut rnd = [0u8; 12];
    OsRng.fill_bytes(&mut rnd);
    let tmp = parent.join(format!(".draft.{}.tmp", hex::encode(rnd)));

    let mut opts = OpenOptions::new();
    opts.create_new(true).write(true);
    #[cfg(unix)]
    {
        opts.mode(0o600);
    }

    let mut f = opts
        .open(&tmp)
        .map_err(|e| AppError::StoreWriteFailed(e.to_string()))?;

    let write_res: AppResult<()> = (|| {
        f.write_all(&json)
            .map_err(|e| AppError::StoreWriteFailed(e.to_string()))?;

        f.flush()
            .map_err(|e| AppError::StoreSyncFailed(e.to_string()))?;
        f.sync_all()
            .map_err(|e| AppError::StoreSyncFailed(e.to_string()))?;

        platform::rename_replace(&tmp, path)
            .map_err(|e| AppError::StoreRenameFailed(e.to_string()))?;

        Ok(())
    })();

    if write_res.is_err() {
        let _ = fs::remove_file(&tmp);
    }

    write_res?;

    let _ = platform::fsync_dir_best_effort(parent);
    Ok(())
}

// ======================================================
// Unit Tests
// ======================================================
