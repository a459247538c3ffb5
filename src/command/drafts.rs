// src/command/drafts.rs

use crate::command_state::*;
use crate::draft_store::{
    decode_drafts, decode_last_accepted, panel_values, restore_panel, DRAFTS_KEY, LAST_SIG_KEY,
};
use crate::error::AppResult;
use crate::panel::{FieldEdit, FormBook, Panel};
use crate::sync_log::record_silent_degrade;
use crate::types::{AppState, LastAccepted, PersistedValues};

/// Read drafts and last-accepted fingerprints from the durable store into
/// memory. Never fails: absent or corrupt entries load as empty.
pub fn load(state: &AppState) -> PersistedValues {
    let drafts = read_entry(state, DRAFTS_KEY, decode_drafts).unwrap_or_default();
    let sigs: LastAccepted = read_entry(state, LAST_SIG_KEY, decode_last_accepted).unwrap_or_default();

    match lock_drafts(state) {
        Ok(mut g) => *g = drafts.clone(),
        Err(e) => record_silent_degrade(state, "load", None, &e),
    }
    match lock_last_accepted(state) {
        Ok(mut g) => *g = sigs,
        Err(e) => record_silent_degrade(state, "load", None, &e),
    }

    drafts
}

fn read_entry<T>(
    state: &AppState,
    key: &str,
    decode: impl FnOnce(serde_json::Value) -> AppResult<T>,
) -> Option<T> {
    let res = (|| {
        let raw = lock_store(state)?.get(key)?;
        raw.map(decode).transpose()
    })();

    match res {
        Ok(v) => v,
        Err(e) => {
            record_silent_degrade(state, "load", None, &e);
            None
        }
    }
}

/// Apply the in-memory drafts for `panel`. Returns the number of fields set.
pub fn restore(state: &AppState, panel: &mut Panel) -> usize {
    let values = match lock_drafts(state) {
        Ok(g) => g.get(panel.key()).cloned(),
        Err(e) => {
            record_silent_degrade(state, "restore", Some(panel.key()), &e);
            None
        }
    };

    values.map(|v| restore_panel(panel, &v)).unwrap_or(0)
}

pub fn restore_book(state: &AppState, book: &mut FormBook) -> usize {
    book.panels_mut().map(|p| restore(state, p)).sum()
}

/// Apply a user edit, then record the field's full current value and write
/// the whole drafts table back.
///
/// Rejected edits (read-only field, unknown option) are returned; storage
/// faults after a successful edit are logged and swallowed.
pub fn on_field_change(
    state: &AppState,
    panel: &mut Panel,
    field: &str,
    edit: FieldEdit,
) -> AppResult<()> {
    panel.apply_edit(field, edit)?;

    let persisted = panel
        .config()
        .field(field)
        .map(|d| d.is_persisted())
        .unwrap_or(false);
    if !persisted {
        return Ok(());
    }

    // for a group this is the full checked set, not just the toggled option
    let Some(value) = panel.value(field).cloned() else {
        return Ok(());
    };

    match lock_drafts(state) {
        Ok(mut drafts) => {
            drafts
                .entry(panel.key().to_string())
                .or_default()
                .insert(field.to_string(), value);
        }
        Err(e) => {
            record_silent_degrade(state, "field_change", Some(panel.key()), &e);
            return Ok(());
        }
    }

    write_drafts_best_effort(state, "field_change", Some(panel.key()));
    Ok(())
}

/// Replace the stored drafts of `panel` with its current values.
pub fn persist_panel(state: &AppState, panel: &Panel, context: &str) {
    let values = panel_values(panel);

    match lock_drafts(state) {
        Ok(mut drafts) => {
            drafts.insert(panel.key().to_string(), values);
        }
        Err(e) => {
            record_silent_degrade(state, context, Some(panel.key()), &e);
            return;
        }
    }

    write_drafts_best_effort(state, context, Some(panel.key()));
}

// ======================================================
// Unit Tests
// ======================================================
