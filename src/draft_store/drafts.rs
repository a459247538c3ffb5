// src/draft_store/drafts.rs

use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::panel::{FieldKind, Panel};
use crate::types::{FieldValue, LastAccepted, PanelValues, PersistedValues};

// Bumping the suffix starts from an empty store; there is no migration.
pub const DRAFTS_KEY: &str = "artcap.drafts.v1";
pub const LAST_SIG_KEY: &str = "artcap.last_sig.v1";

pub fn decode_drafts(v: Value) -> AppResult<PersistedValues> {
    if !v.is_object() {
        return Err(AppError::StoreShapeInvalid("drafts root is not an object".into()));
    }
    serde_json::from_value(v).map_err(|e| AppError::StoreShapeInvalid(e.to_string()))
}

pub fn decode_last_accepted(v: Value) -> AppResult<LastAccepted> {
    if !v.is_object() {
        return Err(AppError::StoreShapeInvalid(
            "fingerprint table is not an object".into(),
        ));
    }
    serde_json::from_value(v).map_err(|e| AppError::StoreShapeInvalid(e.to_string()))
}

pub fn encode_drafts(values: &PersistedValues) -> AppResult<Value> {
    serde_json::to_value(values).map_err(|e| AppError::StoreWriteFailed(e.to_string()))
}

pub fn encode_last_accepted(table: &LastAccepted) -> AppResult<Value> {
    serde_json::to_value(table).map_err(|e| AppError::StoreWriteFailed(e.to_string()))
}

/// Current values of every persisted field of `panel`.
pub fn panel_values(panel: &Panel) -> PanelValues {
    panel
        .config()
        .fields
        .iter()
        .filter(|def| def.is_persisted())
        .filter_map(|def| panel.value(&def.name).map(|v| (def.name.clone(), v.clone())))
        .collect()
}

/// Apply stored draft values to a live panel.
///
/// Only persisted, non-constant fields are touched.
/// A stored value that no longer fits the field (unknown option, wrong shape)
/// leaves the field cleared rather than failing the restore.
pub fn restore_panel(panel: &mut Panel, values: &PanelValues) -> usize {
    let defs: Vec<_> = panel
        .config()
        .fields
        .iter()
        .filter(|def| def.is_persisted() && def.constant.is_none())
        .cloned()
        .collect();

    let mut applied = 0;
    for def in defs {
        let Some(stored) = values.get(&def.name) else {
            continue;
        };

        let value = match (&def.kind, stored) {
            (FieldKind::Checkbox, FieldValue::Flag(b)) => Some(FieldValue::Flag(*b)),

            (FieldKind::CheckboxGroup { options }, stored) => {
                let set = stored.as_choice_set();
                Some(FieldValue::Choices(
                    options.iter().filter(|o| set.contains(*o)).cloned().collect(),
                ))
            }

            (FieldKind::Select { options } | FieldKind::Radio { options }, FieldValue::Text(s)) => {
                if options.contains(s) {
                    Some(FieldValue::Text(s.clone()))
                } else {
                    Some(FieldValue::empty_text())
                }
            }

            (
                FieldKind::Scalar | FieldKind::Hidden | FieldKind::Control,
                FieldValue::Text(s),
            ) => Some(FieldValue::Text(s.clone())),

            _ => None,
        };

        if let Some(v) = value {
            if panel.write_value(&def.name, v).is_ok() {
                applied += 1;
            }
        }
    }
    applied
}

// ======================================================
// Unit Tests
// ======================================================
