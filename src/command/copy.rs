// src/command/copy.rs

use crate::error::{AppError, AppResult};
use crate::panel::{FieldDef, FieldKind, FormBook, Panel, PanelState};
use crate::sync_log::record_silent_degrade;
use crate::types::{AppState, FieldValue, PanelKey};

use super::drafts::persist_panel;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub source: Option<PanelKey>,
    pub copied: Vec<String>,
    pub skipped: Vec<String>,
}

/// Copy the target panel's layout fields from its configured source panel.
///
/// Control, file and read-only target fields are never written. A field
/// missing on either side is skipped. Configuration faults (unknown target,
/// no or unknown source) leave every panel untouched and are logged.
pub fn copy_into(state: &AppState, book: &mut FormBook, target: &str) -> CopyReport {
    let source = match resolve_source(book, target) {
        Ok(s) => s,
        Err(e) => {
            record_silent_degrade(state, "copy_into", Some(target), &e);
            return CopyReport::default();
        }
    };

    // read the whole source first; source and target may not alias
    let source_values: PanelState = match book.get(&source) {
        Some(p) => p.state().clone(),
        None => return CopyReport::default(),
    };

    let Some(panel) = book.get_mut(target) else {
        return CopyReport::default();
    };

    let mut report = CopyReport {
        source: Some(source),
        ..CopyReport::default()
    };

    for name in panel.config().copy_fields.clone() {
        match copy_field(panel, &name, &source_values) {
            Some(true) => report.copied.push(name),
            Some(false) | None => report.skipped.push(name),
        }
    }

    persist_panel(state, panel, "copy_into");
    report
}

fn resolve_source(book: &FormBook, target: &str) -> AppResult<PanelKey> {
    let panel = book.panel(target)?;
    let source = panel
        .config()
        .copy_from
        .clone()
        .ok_or_else(|| AppError::CopySourceNotConfigured(target.to_string()))?;

    book.panel(&source)?;
    Ok(source)
}

// None: not eligible or absent. Some(false): write rejected.
fn copy_field(panel: &mut Panel, name: &str, source: &PanelState) -> Option<bool> {
    let def: FieldDef = panel.config().field(name)?.clone();
    if def.is_control() || def.is_file() || def.read_only {
        return None;
    }

    let src = source.get(name)?;
    let value = copied_value(&def.kind, src)?;

    Some(panel.write_value(&def.name, value).is_ok())
}

fn copied_value(kind: &FieldKind, src: &FieldValue) -> Option<FieldValue> {
    match kind {
        FieldKind::CheckboxGroup { options } => {
            let set = src.as_choice_set();
            Some(FieldValue::Choices(
                options.iter().filter(|o| set.contains(*o)).cloned().collect(),
            ))
        }

        FieldKind::Select { options } | FieldKind::Radio { options } => {
            let picked = match src {
                FieldValue::Text(s) => Some(s.as_str()),
                FieldValue::Choices(v) => v.first().map(String::as_str),
                FieldValue::Flag(_) => None,
            };
            Some(match picked {
                Some(s) if options.iter().any(|o| o == s) => FieldValue::Text(s.to_string()),
                _ => FieldValue::empty_text(),
            })
        }

        FieldKind::Checkbox => Some(FieldValue::Flag(match src {
            FieldValue::Flag(b) => *b,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Choices(v) => !v.is_empty(),
        })),

        FieldKind::Scalar | FieldKind::Hidden => src.as_text().map(|s| FieldValue::Text(s.to_string())),

        FieldKind::File | FieldKind::Control => None,
    }
}

// ======================================================
// Unit Tests
// ======================================================
