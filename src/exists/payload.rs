// src/exists/payload.rs

use crate::panel::{FieldKind, Panel};
use crate::types::FieldValue;

/// Ordered name/value pairs exactly as a browser would submit the panel's form.
///
/// Multi-choice fields appear once per selected option. File fields are
/// omitted; unchecked standalone checkboxes and empty radio groups are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormPayload {
    pairs: Vec<(String, String)>,
}

impl FormPayload {
    pub fn from_panel(panel: &Panel) -> Self {
        let mut pairs = Vec::new();

        for def in &panel.config().fields {
            let Some(value) = panel.value(&def.name) else {
                continue;
            };

            match (&def.kind, value) {
                (FieldKind::File, _) => {}

                (FieldKind::Checkbox, FieldValue::Flag(true)) => {
                    pairs.push((def.name.clone(), "on".to_string()));
                }
                (FieldKind::Checkbox, _) => {}

                (FieldKind::CheckboxGroup { .. }, FieldValue::Choices(selected)) => {
                    for opt in selected {
                        pairs.push((def.name.clone(), opt.clone()));
                    }
                }

                (FieldKind::Radio { .. }, FieldValue::Text(s)) if s.is_empty() => {}

                (_, FieldValue::Text(s)) => pairs.push((def.name.clone(), s.clone())),

                _ => {}
            }
        }

        Self { pairs }
    }

    /// Replace every pair named `name` with a single pair.
    pub fn set_marker(&mut self, name: &str, value: &str) {
        self.pairs.retain(|(k, _)| k != name);
        self.pairs.push((name.to_string(), value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
