// src/panel/book.rs

use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};
use crate::types::PanelKey;

use super::state::Panel;
use super::types::PanelConfig;

/// All live panels of the capture form, one per record category.
///
/// Panels keep the order they were configured in; the first one starts selected.
#[derive(Clone, Debug, Default)]
pub struct FormBook {
    panels: BTreeMap<PanelKey, Panel>,
    order: Vec<PanelKey>,
    selected: Option<PanelKey>,
}

impl FormBook {
    pub fn new(configs: Vec<PanelConfig>) -> Self {
        let mut panels = BTreeMap::new();
        let mut order = Vec::new();
        for c in configs {
            if !panels.contains_key(&c.key) {
                order.push(c.key.clone());
            }
            panels.insert(c.key.clone(), Panel::new(c));
        }
        let selected = order.first().cloned();

        Self {
            panels,
            order,
            selected,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Panel> {
        self.panels.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Panel> {
        self.panels.get_mut(key)
    }

    pub fn panel(&self, key: &str) -> AppResult<&Panel> {
        self.get(key)
            .ok_or_else(|| AppError::UnknownPanel(key.to_string()))
    }

    pub fn panel_mut(&mut self, key: &str) -> AppResult<&mut Panel> {
        self.panels
            .get_mut(key)
            .ok_or_else(|| AppError::UnknownPanel(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &PanelKey> {
        self.order.iter()
    }

    pub fn panels_mut(&mut self) -> impl Iterator<Item = &mut Panel> {
        self.panels.values_mut()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, key: &str) -> AppResult<()> {
        if !self.panels.contains_key(key) {
            return Err(AppError::UnknownPanel(key.to_string()));
        }
        self.selected = Some(key.to_string());
        Ok(())
    }
}
