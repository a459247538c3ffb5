// src/panel/state.rs

use std::collections::{BTreeMap, HashMap};

use crate::error::{AppError, AppResult};
use crate::types::FieldValue;

use super::types::{
    FieldDef, FieldKind, PanelConfig, GPS_ACC_FIELD, GPS_ALT_FIELD, GPS_FIELDS, GPS_LAT_FIELD,
    GPS_LON_FIELD, GPS_STATUS_PROMPT,
};

/// Field name -> value snapshot of a panel. Iteration order is unspecified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelState {
    values: HashMap<String, FieldValue>,
}

impl PanelState {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for PanelState {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A user edit as delivered by the input layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldEdit {
    /// text entry, select change, radio click, mode switch
    Set(String),
    /// standalone checkbox
    Check(bool),
    /// one option of a checkbox group
    Toggle { option: String, checked: bool },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GpsFix {
    pub lat: f64,
    pub lon: f64,
    pub alt: Option<f64>,
    pub acc: Option<f64>,
}

/// Live panel: configuration plus the current value of every control.
#[derive(Clone, Debug)]
pub struct Panel {
    config: PanelConfig,
    state: PanelState,
    files: BTreeMap<String, Vec<String>>,
    gps_status: String,
}

impl Panel {
    pub fn new(config: PanelConfig) -> Self {
        let mut state = PanelState::default();
        let mut files = BTreeMap::new();

        for def in &config.fields {
            match initial_value(def) {
                Some(v) => state.set(def.name.clone(), v),
                None => {
                    files.insert(def.name.clone(), Vec::new());
                }
            }
        }

        Self {
            config,
            state,
            files,
            gps_status: GPS_STATUS_PROMPT.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.config.key
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.state.get(name)
    }

    pub fn gps_status(&self) -> &str {
        &self.gps_status
    }

    pub fn selected_files(&self, name: &str) -> &[String] {
        self.files.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Snapshot used for fingerprinting: file and control fields excluded.
    pub fn snapshot(&self) -> PanelState {
        self.config
            .fields
            .iter()
            .filter(|def| def.is_fingerprinted())
            .filter_map(|def| {
                self.state
                    .get(&def.name)
                    .map(|v| (def.name.clone(), v.clone()))
            })
            .collect()
    }

    /// Apply a user edit. Read-only fields reject edits.
    pub fn apply_edit(&mut self, name: &str, edit: FieldEdit) -> AppResult<()> {
        let def = self.def(name)?;
        if def.read_only {
            return Err(AppError::FieldReadOnly(name.to_string()));
        }

        let value = match (&def.kind, edit) {
            (FieldKind::Checkbox, FieldEdit::Check(b)) => FieldValue::Flag(b),
            (FieldKind::Checkbox, _) => return Err(mismatch(def)),

            (FieldKind::CheckboxGroup { options }, FieldEdit::Toggle { option, checked }) => {
                if !options.contains(&option) {
                    return Err(AppError::UnknownOption {
                        field: name.to_string(),
                        option,
                    });
                }

                let mut current = match self.state.get(name) {
                    Some(FieldValue::Choices(v)) => v.clone(),
                    _ => Vec::new(),
                };
                current.retain(|o| *o != option);
                if checked {
                    current.push(option);
                }
                FieldValue::Choices(current)
            }
            (FieldKind::CheckboxGroup { .. }, _) => return Err(mismatch(def)),

            (FieldKind::File, _) => return Err(mismatch(def)),

            (_, FieldEdit::Set(s)) => FieldValue::Text(s),
            (_, _) => return Err(mismatch(def)),
        };

        self.write_value(name, value)
    }

    pub fn select_files(&mut self, name: &str, files: Vec<String>) -> AppResult<()> {
        let def = self.def(name)?;
        if !def.is_file() {
            return Err(mismatch(def));
        }
        self.files.insert(name.to_string(), files);
        Ok(())
    }

    /// Value set by the external GPS capture flow.
    pub fn record_gps(&mut self, fix: GpsFix) {
        let fmt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();

        let _ = self.write_value(GPS_LAT_FIELD, FieldValue::Text(fix.lat.to_string()));
        let _ = self.write_value(GPS_LON_FIELD, FieldValue::Text(fix.lon.to_string()));
        let _ = self.write_value(GPS_ALT_FIELD, FieldValue::Text(fmt(fix.alt)));
        let _ = self.write_value(GPS_ACC_FIELD, FieldValue::Text(fmt(fix.acc)));

        self.gps_status = match fix.acc {
            Some(acc) => format!("Location captured (±{acc:.0} m)."),
            None => "Location captured.".to_string(),
        };
    }

    /// Programmatic write (restore / reset / copy). Validates kind and options
    /// but not read-only; callers own that policy.
    pub(crate) fn write_value(&mut self, name: &str, value: FieldValue) -> AppResult<()> {
        let def = self.def(name)?;

        let value = match (&def.kind, value) {
            (FieldKind::Checkbox, v @ FieldValue::Flag(_)) => v,

            (FieldKind::CheckboxGroup { options }, FieldValue::Choices(selected)) => {
                let mut out: Vec<String> = Vec::with_capacity(selected.len());
                for opt in selected {
                    if !options.contains(&opt) {
                        return Err(AppError::UnknownOption {
                            field: name.to_string(),
                            option: opt,
                        });
                    }
                    if !out.contains(&opt) {
                        out.push(opt);
                    }
                }
                FieldValue::Choices(out)
            }

            (FieldKind::Select { options } | FieldKind::Radio { options }, FieldValue::Text(s)) => {
                if !s.is_empty() && !options.contains(&s) {
                    return Err(AppError::UnknownOption {
                        field: name.to_string(),
                        option: s,
                    });
                }
                FieldValue::Text(s)
            }

            (FieldKind::Scalar | FieldKind::Hidden | FieldKind::Control, v @ FieldValue::Text(_)) => {
                v
            }

            _ => return Err(mismatch(def)),
        };

        self.state.set(name.to_string(), value);
        Ok(())
    }

    pub(crate) fn clear_files(&mut self, name: &str) {
        if let Some(f) = self.files.get_mut(name) {
            f.clear();
        }
    }

    pub(crate) fn reset_gps(&mut self) {
        for name in GPS_FIELDS {
            if self.config.field(name).is_some() {
                let _ = self.write_value(name, FieldValue::empty_text());
            }
        }
        self.gps_status = GPS_STATUS_PROMPT.to_string();
    }

    fn def(&self, name: &str) -> AppResult<&FieldDef> {
        self.config.field(name).ok_or_else(|| AppError::UnknownField {
            panel: self.config.key.clone(),
            field: name.to_string(),
        })
    }
}

/// Value a field holds on a fresh panel and after a reset. `None` for file fields.
pub(crate) fn initial_value(def: &FieldDef) -> Option<FieldValue> {
    if let Some(c) = &def.constant {
        return Some(FieldValue::Text(c.clone()));
    }

    match &def.kind {
        FieldKind::File => None,
        FieldKind::Select { options } => Some(FieldValue::Text(
            options.first().cloned().unwrap_or_default(),
        )),
        FieldKind::Checkbox => Some(FieldValue::Flag(false)),
        FieldKind::CheckboxGroup { .. } => Some(FieldValue::Choices(Vec::new())),
        FieldKind::Scalar | FieldKind::Hidden | FieldKind::Radio { .. } | FieldKind::Control => {
            Some(FieldValue::empty_text())
        }
    }
}

fn mismatch(def: &FieldDef) -> AppError {
    AppError::FieldKindMismatch {
        field: def.name.clone(),
        expected: def.kind.name(),
    }
}

// ======================================================
// Unit Tests
// ======================================================
