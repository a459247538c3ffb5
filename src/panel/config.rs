// src/panel/config.rs

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{AppError, AppResult};

use super::types::{
    FieldDef, FieldKind, PanelConfig, ACTION_FIELD, CATEGORY_FIELD, GPS_FIELDS, PHOTO_FIELD,
    SUBMIT_MODE_FIELD,
};

const MAX_CONFIG_BYTES: u64 = 256 * 1024;

// server-managed timestamp columns: shown but never edited, reset or copied into
const SERVER_NOW_COLUMNS: [&str; 2] = ["date_recorded", "date_updated"];

#[derive(Debug, Deserialize)]
struct RawConfig {
    // declaration order decides the default panel and tab order
    #[serde(deserialize_with = "panels_in_order")]
    panels: Vec<(String, RawPanel)>,
}

fn panels_in_order<'de, D>(de: D) -> Result<Vec<(String, RawPanel)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedPanels;

    impl<'de> Visitor<'de> for OrderedPanels {
        type Value = Vec<(String, RawPanel)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of panel definitions")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out: Vec<(String, RawPanel)> = Vec::new();
            while let Some((key, panel)) = map.next_entry::<String, RawPanel>()? {
                if out.iter().any(|(k, _)| *k == key) {
                    return Err(de::Error::custom(format!("duplicate panel {key:?}")));
                }
                out.push((key, panel));
            }
            Ok(out)
        }
    }

    de.deserialize_map(OrderedPanels)
}

#[derive(Debug, Deserialize)]
struct RawPanel {
    #[serde(default)]
    label: Option<String>,
    input_fields: Vec<Vec<String>>,
    #[serde(default)]
    layout_rows: Vec<Vec<String>>,
    #[serde(default)]
    fields_to_reset: Vec<String>,
    #[serde(default)]
    copy_from: Option<String>,
    #[serde(default)]
    readonly: Vec<String>,
    #[serde(default)]
    file_fields: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetKind {
    Text,
    Dropdown,
    Radio,
    Checkbox,
}

pub fn load_panel_config(path: &Path) -> AppResult<Vec<PanelConfig>> {
    let meta = fs::metadata(path).map_err(|e| AppError::PanelConfigRead(e.to_string()))?;
    if meta.len() > MAX_CONFIG_BYTES {
        return Err(AppError::PanelConfigTooLarge);
    }

    let text = fs::read_to_string(path).map_err(|e| AppError::PanelConfigRead(e.to_string()))?;
    parse_panel_config(&text)
}

pub fn parse_panel_config(text: &str) -> AppResult<Vec<PanelConfig>> {
    if text.len() as u64 > MAX_CONFIG_BYTES {
        return Err(AppError::PanelConfigTooLarge);
    }

    let raw: RawConfig =
        serde_json::from_str(text).map_err(|e| AppError::PanelConfigInvalid(e.to_string()))?;

    if raw.panels.is_empty() {
        return Err(AppError::PanelConfigInvalid("no panels defined".into()));
    }

    raw.panels
        .into_iter()
        .map(|(key, p)| build_panel(key, p))
        .collect()
}

fn build_panel(key: String, raw: RawPanel) -> AppResult<PanelConfig> {
    if key.trim().is_empty() {
        return Err(AppError::PanelConfigInvalid("empty panel key".into()));
    }
    if raw.input_fields.is_empty() {
        return Err(AppError::PanelConfigInvalid(format!(
            "panel {key} has no input_fields"
        )));
    }

    let readonly: BTreeSet<&str> = raw.readonly.iter().map(String::as_str).collect();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut fields: Vec<FieldDef> = Vec::new();

    for tuple in &raw.input_fields {
        let def = build_field(&key, tuple, &readonly)?;
        if !seen.insert(def.name.clone()) {
            return Err(AppError::PanelConfigInvalid(format!(
                "panel {key} declares field {} twice",
                def.name
            )));
        }
        fields.push(def);
    }

    // Fields every capture form carries besides the configured columns.
    let mut category = FieldDef::new(CATEGORY_FIELD, FieldKind::Hidden).read_only();
    category.constant = Some(key.clone());

    let mut system = vec![
        category,
        FieldDef::new(ACTION_FIELD, FieldKind::Control),
        FieldDef::new(SUBMIT_MODE_FIELD, FieldKind::Control),
        FieldDef::new(PHOTO_FIELD, FieldKind::File).with_label("Photo"),
    ];
    system.extend(raw.file_fields.iter().map(|n| FieldDef::new(n.clone(), FieldKind::File)));
    system.extend(GPS_FIELDS.iter().map(|n| FieldDef::new(*n, FieldKind::Hidden)));

    for def in system {
        if seen.insert(def.name.clone()) {
            fields.push(def);
        }
    }

    // Layout order, first occurrence wins.
    let mut copy_fields: Vec<String> = Vec::new();
    for name in raw.layout_rows.iter().flatten() {
        if !name.is_empty() && !copy_fields.contains(name) {
            copy_fields.push(name.clone());
        }
    }

    let copy_from = raw
        .copy_from
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(PanelConfig {
        label: raw.label.unwrap_or_else(|| title_case(&key)),
        key,
        fields,
        reset_fields: raw.fields_to_reset,
        copy_fields,
        copy_from,
    })
}

/// `[label, column, sql_type?, widget?]`
fn build_field(panel: &str, tuple: &[String], readonly: &BTreeSet<&str>) -> AppResult<FieldDef> {
    let (label, name) = match tuple {
        [label, name, ..] if !name.trim().is_empty() => (label.clone(), name.trim().to_string()),
        _ => {
            return Err(AppError::PanelConfigInvalid(format!(
                "panel {panel}: field tuple needs [label, column, ...], got {tuple:?}"
            )))
        }
    };

    let sql_type = tuple.get(2).map(|s| s.trim().to_uppercase()).unwrap_or_else(|| "TEXT".into());
    let extra = tuple.get(3).map(String::as_str).unwrap_or("");

    let mut def = FieldDef::new(name.clone(), FieldKind::Scalar).with_label(label);

    if sql_type == "CONSTANT" {
        def.constant = Some(extra.to_string());
        def.read_only = true;
        return Ok(def);
    }

    let (widget, options) = parse_widget(extra)?;
    def.kind = match widget {
        WidgetKind::Text => FieldKind::Scalar,
        WidgetKind::Dropdown => FieldKind::Select { options },
        WidgetKind::Radio => FieldKind::Radio { options },
        WidgetKind::Checkbox => FieldKind::CheckboxGroup { options },
    };

    let server_now = sql_type.starts_with("TIMESTAMP")
        && SERVER_NOW_COLUMNS.contains(&name.to_lowercase().as_str());

    def.read_only = server_now || readonly.contains(name.as_str());
    Ok(def)
}

/// Parse `DROPDOWN('a', 'b')`, `RADIO("a","b")` or `CHECKBOX('a')`.
/// An empty or unrecognised widget string is a plain text input.
pub fn parse_widget(raw: &str) -> AppResult<(WidgetKind, Vec<String>)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok((WidgetKind::Text, Vec::new()));
    }

    let up = raw.to_uppercase();
    let kind = if up.starts_with("DROPDOWN") {
        WidgetKind::Dropdown
    } else if up.starts_with("RADIO") {
        WidgetKind::Radio
    } else if up.starts_with("CHECKBOX") {
        WidgetKind::Checkbox
    } else {
        return Ok((WidgetKind::Text, Vec::new()));
    };

    let open = raw
        .find('(')
        .ok_or_else(|| AppError::WidgetSpecInvalid(raw.to_string()))?;
    let close = raw
        .rfind(')')
        .filter(|c| *c > open)
        .ok_or_else(|| AppError::WidgetSpecInvalid(raw.to_string()))?;

    let options = parse_quoted_list(&raw[open + 1..close])
        .ok_or_else(|| AppError::WidgetSpecInvalid(raw.to_string()))?;

    if options.is_empty() {
        return Err(AppError::WidgetSpecInvalid(raw.to_string()));
    }

    Ok((kind, options))
}

fn parse_quoted_list(inner: &str) -> Option<Vec<String>> {
    let mut out = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace() || *c == ',') {
            chars.next();
        }

        let quote = match chars.next() {
            None => return Some(out),
            Some(q @ ('\'' | '"')) => q,
            Some(_) => return None,
        };

        let mut item = String::new();
        loop {
            match chars.next() {
                None => return None,
                Some('\\') => item.push(chars.next()?),
                Some(c) if c == quote => break,
                Some(c) => item.push(c),
            }
        }
        out.push(item);
    }
}

fn title_case(key: &str) -> String {
    let mut c = key.chars();
    match c.next() {
        Some(first) => first.to_uppercase().chain(c).collect(),
        None => String::new(),
    }
}

// ======================================================
// Unit Tests
// ======================================================
