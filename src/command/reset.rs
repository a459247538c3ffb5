// src/command/reset.rs

use crate::error::AppError;
use crate::panel::{initial_value, Panel};
use crate::sync_log::record_silent_degrade;
use crate::types::AppState;

use super::drafts::persist_panel;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetScope {
    /// every field except control and read-only fields
    All,
    /// only these names; each name covers every control sharing it
    Named(Vec<String>),
    /// the panel's configured "reset selected" list
    Configured,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub cleared: Vec<String>,
    pub skipped: Vec<String>,
}

/// Clear fields of `panel` according to `scope`, then persist the panel's drafts.
///
/// Never fails outward. A field that cannot be cleared is reported in
/// `skipped` and does not stop the others.
pub fn reset(state: &AppState, panel: &mut Panel, scope: ResetScope) -> ResetReport {
    let mut report = ResetReport::default();

    let names: Vec<String> = match &scope {
        ResetScope::All => panel
            .config()
            .fields
            .iter()
            .filter(|d| !d.is_control() && !d.read_only)
            .map(|d| d.name.clone())
            .collect(),
        ResetScope::Named(names) => names.clone(),
        ResetScope::Configured => panel.config().reset_fields.clone(),
    };

    if names.is_empty() {
        if scope == ResetScope::Configured {
            record_silent_degrade(
                state,
                "reset",
                Some(panel.key()),
                &AppError::Msg("no fields configured for reset".into()),
            );
        }
        return report;
    }

    for name in names {
        match clear_field(panel, &name) {
            Ok(()) => report.cleared.push(name),
            Err(e) => {
                if !matches!(e, AppError::FieldReadOnly(_)) {
                    record_silent_degrade(state, "reset", Some(panel.key()), &e);
                }
                report.skipped.push(name);
            }
        }
    }

    if scope == ResetScope::All {
        panel.reset_gps();
    }

    persist_panel(state, panel, "reset");
    report
}

fn clear_field(panel: &mut Panel, name: &str) -> Result<(), AppError> {
    let def = panel
        .config()
        .field(name)
        .cloned()
        .ok_or_else(|| AppError::UnknownField {
            panel: panel.key().to_string(),
            field: name.to_string(),
        })?;

    if def.read_only {
        return Err(AppError::FieldReadOnly(def.name));
    }

    match initial_value(&def) {
        Some(v) => panel.write_value(&def.name, v),
        None => {
            panel.clear_files(&def.name);
            Ok(())
        }
    }
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft_store::MemoryKv;
    use crate::panel::{FieldDef, FieldEdit, FieldKind, PanelConfig, ACTION_FIELD};
    use crate::types::FieldValue;
    use tempfile::tempdir;

    fn mk_panel() -> Panel {
        let mut cfg = PanelConfig::new(
            "bag",
            vec![
                FieldDef::new("notes", FieldKind::Scalar),
                FieldDef::new("season", FieldKind::Select { options: vec!["2023".into(), "2024".into()] }),
                FieldDef::new("date_recorded", FieldKind::Scalar).read_only(),
                FieldDef::new(ACTION_FIELD, FieldKind::Control),
            ],
        );
        cfg.reset_fields = vec!["notes".into(), "ghost".into()];
        Panel::new(cfg)
    }

    #[test]
    fn a_bad_name_does_not_stop_the_rest() {
        let td = tempdir().unwrap();
        let state = AppState::new_for_tests(td.path(), Box::new(MemoryKv::new())).unwrap();
        let mut p = mk_panel();
        p.apply_edit("notes", FieldEdit::Set("x".into())).unwrap();

        let r = reset(&state, &mut p, ResetScope::Configured);
        assert_eq!(r.cleared, vec!["notes".to_string()]);
        assert_eq!(r.skipped, vec!["ghost".to_string()]);
        assert_eq!(p.value("notes"), Some(&FieldValue::empty_text()));
    }

    #[test]
    fn select_reverts_to_first_option() {
        let td = tempdir().unwrap();
        let state = AppState::new_for_tests(td.path(), Box::new(MemoryKv::new())).unwrap();
        let mut p = mk_panel();
        p.apply_edit("season", FieldEdit::Set("2024".into())).unwrap();

        reset(&state, &mut p, ResetScope::All);
        assert_eq!(p.value("season"), Some(&FieldValue::Text("2023".into())));
    }

    #[test]
    fn empty_configured_list_is_a_noop() {
        let td = tempdir().unwrap();
        let state = AppState::new_for_tests(td.path(), Box::new(MemoryKv::new())).unwrap();
        let mut p = Panel::new(PanelConfig::new("x", vec![FieldDef::new("a", FieldKind::Scalar)]));
        p.apply_edit("a", FieldEdit::Set("keep".into())).unwrap();

        let r = reset(&state, &mut p, ResetScope::Configured);
        assert_eq!(r, ResetReport::default());
        assert_eq!(p.value("a"), Some(&FieldValue::Text("keep".into())));
    }
}
