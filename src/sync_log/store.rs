// src/sync_log/store.rs

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::AppResult;
use crate::platform;

use super::model::{
    SyncEvent, SyncEventClass, LOG_BACKUP_NAME, LOG_FILE_NAME, MAX_LOG_BYTES, MAX_LOG_EVENTS,
};

/// Append-only JSONL trail of absorbed faults and duplicate-prompt answers.
///
/// The last `MAX_LOG_EVENTS` entries are mirrored in memory. Disk writes never
/// fail the caller.
pub struct SyncLog {
    path: PathBuf,
    buf: VecDeque<SyncEvent>,
    next_id: u64,
    degrade_warn_pending: bool,
}

impl SyncLog {
    pub fn init(app_data_dir: &Path) -> AppResult<Self> {
        fs::create_dir_all(app_data_dir)?;

        let path = app_data_dir.join(LOG_FILE_NAME);
        let buf = read_recent(&path);
        let next_id = buf.back().map_or(1, |e| e.id.saturating_add(1));

        let mut log = Self {
            path,
            buf,
            next_id,
            degrade_warn_pending: false,
        };

        if let Some(fail) = platform::restrict_dir_perms_best_effort(app_data_dir) {
            log.record(
                SyncEventClass::SilentDegrade,
                fail.kind,
                None,
                "sync_log_init",
                fail.msg,
            );
        }

        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(
        &mut self,
        class: SyncEventClass,
        kind: &str,
        panel: Option<&str>,
        context: &str,
        msg: &str,
    ) {
        let ev = SyncEvent {
            id: self.next_id,
            ts_ms: now_ms(),
            class,
            kind: kind.to_string(),
            panel: panel.map(str::to_string),
            context: context.to_string(),
            msg: msg.to_string(),
        };
        self.next_id = self.next_id.saturating_add(1);

        if class == SyncEventClass::SilentDegrade {
            self.degrade_warn_pending = true;
        }

        // nowhere left to report a failed log write
        let _ = self.append(&ev);
        push_bounded(&mut self.buf, ev);
    }

    pub fn recent(&self) -> Vec<SyncEvent> {
        self.buf.iter().cloned().collect()
    }

    pub fn take_degrade_warn_pending(&mut self) -> bool {
        std::mem::take(&mut self.degrade_warn_pending)
    }

    fn append(&self, ev: &SyncEvent) -> io::Result<()> {
        let mut fresh = true;
        if let Ok(meta) = fs::metadata(&self.path) {
            if meta.len() > MAX_LOG_BYTES {
                platform::rename_replace(&self.path, &self.path.with_file_name(LOG_BACKUP_NAME))?;
            } else {
                fresh = false;
            }
        }

        let mut line = serde_json::to_string(ev)?;
        line.push('\n');

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if fresh {
            let _ = platform::restrict_file_perms_best_effort(&self.path);
        }
        f.write_all(line.as_bytes())
    }
}

fn push_bounded(buf: &mut VecDeque<SyncEvent>, ev: SyncEvent) {
    if buf.len() == MAX_LOG_EVENTS {
        buf.pop_front();
    }
    buf.push_back(ev);
}

// Unreadable lines are skipped; a missing file is an empty history.
fn read_recent(path: &Path) -> VecDeque<SyncEvent> {
    let mut buf = VecDeque::with_capacity(MAX_LOG_EVENTS);
    let Ok(text) = fs::read_to_string(path) else {
        return buf;
    };

    for ev in text
        .lines()
        .filter_map(|l| serde_json::from_str::<SyncEvent>(l).ok())
    {
        push_bounded(&mut buf, ev);
    }
    buf
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn events_survive_reopen_and_ids_keep_increasing() {
        let td = tempdir().unwrap();

        {
            let mut log = SyncLog::init(td.path()).unwrap();
            log.record(SyncEventClass::FailOpen, "exists_check", Some("bag"), "submit", "refused");
            log.record(SyncEventClass::UserDecision, "duplicate_declined", Some("bag"), "submit", "");
        }

        let mut log = SyncLog::init(td.path()).unwrap();
        let recent = log.recent();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].panel.as_deref(), Some("bag"));

        log.record(SyncEventClass::FailOpen, "exists_check", None, "submit", "again");
        assert_eq!(log.recent().last().unwrap().id, 3);
    }

    #[test]
    fn only_silent_degrades_raise_the_warn_flag() {
        let td = tempdir().unwrap();
        let mut log = SyncLog::init(td.path()).unwrap();
        let _ = log.take_degrade_warn_pending();

        log.record(SyncEventClass::FailOpen, "exists_check", None, "submit", "x");
        assert!(!log.take_degrade_warn_pending());

        log.record(SyncEventClass::SilentDegrade, "draft_write", None, "field_change", "full");
        assert!(log.take_degrade_warn_pending());
        assert!(!log.take_degrade_warn_pending());
    }

    #[test]
    fn in_memory_ring_is_bounded() {
        let td = tempdir().unwrap();
        let mut log = SyncLog::init(td.path()).unwrap();

        for i in 0..(MAX_LOG_EVENTS + 5) {
            log.record(SyncEventClass::FailOpen, "k", None, "c", &i.to_string());
        }

        let recent = log.recent();
        assert_eq!(recent.len(), MAX_LOG_EVENTS);
        assert_eq!(recent.last().unwrap().msg, (MAX_LOG_EVENTS + 4).to_string());
    }

    #[test]
    fn reopen_keeps_only_the_newest_events() {
        let td = tempdir().unwrap();
        {
            let mut log = SyncLog::init(td.path()).unwrap();
            for i in 0..(MAX_LOG_EVENTS + 3) {
                log.record(SyncEventClass::FailOpen, "k", None, "c", &i.to_string());
            }
        }

        let log = SyncLog::init(td.path()).unwrap();
        let recent = log.recent();
        assert_eq!(recent.len(), MAX_LOG_EVENTS);
        assert_eq!(recent[0].msg, "3");
    }

    #[test]
    fn oversized_log_is_rotated_to_backup() {
        let td = tempdir().unwrap();
        let path = td.path().join(LOG_FILE_NAME);
        fs::write(&path, vec![b'x'; MAX_LOG_BYTES as usize + 1]).unwrap();

        let mut log = SyncLog::init(td.path()).unwrap();
        log.record(SyncEventClass::FailOpen, "exists_check", None, "submit", "after");

        let backup = td.path().join(LOG_BACKUP_NAME);
        assert_eq!(fs::metadata(&backup).unwrap().len(), MAX_LOG_BYTES + 1);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("\"after\""));
    }

    #[test]
    fn garbage_lines_are_skipped_on_load() {
        let td = tempdir().unwrap();
        fs::write(td.path().join(LOG_FILE_NAME), "not json\n{\"also\": \"wrong\"}\n").unwrap();

        let log = SyncLog::init(td.path()).unwrap();
        assert!(log.recent().is_empty());
    }
}
