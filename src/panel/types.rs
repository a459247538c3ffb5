// src/panel/types.rs

use crate::types::PanelKey;

pub const ACTION_FIELD: &str = "action";
pub const SUBMIT_MODE_FIELD: &str = "submit_mode";
pub const CONTROL_FIELDS: [&str; 2] = [ACTION_FIELD, SUBMIT_MODE_FIELD];

/// Hidden selector carrying the record category; never restored from drafts.
pub const CATEGORY_FIELD: &str = "object_type";

pub const PHOTO_FIELD: &str = "photo";

pub const GPS_LAT_FIELD: &str = "gps_lat";
pub const GPS_LON_FIELD: &str = "gps_lon";
pub const GPS_ALT_FIELD: &str = "gps_alt";
pub const GPS_ACC_FIELD: &str = "gps_acc";
pub const GPS_FIELDS: [&str; 4] = [GPS_LAT_FIELD, GPS_LON_FIELD, GPS_ALT_FIELD, GPS_ACC_FIELD];

pub const GPS_STATUS_PROMPT: &str = "Location not captured. Tap \"Get GPS\" to record it.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// text / number / date input
    Scalar,
    /// hidden input populated programmatically (category, GPS)
    Hidden,
    /// single select; resets to its first option
    Select { options: Vec<String> },
    /// radio group sharing one name
    Radio { options: Vec<String> },
    /// standalone boolean checkbox
    Checkbox,
    /// checkbox group sharing one name
    CheckboxGroup { options: Vec<String> },
    File,
    /// action / mode selector
    Control,
}

impl FieldKind {
    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::Select { options }
            | FieldKind::Radio { options }
            | FieldKind::CheckboxGroup { options } => options,
            _ => &[],
        }
    }

    pub fn is_single_choice(&self) -> bool {
        matches!(self, FieldKind::Select { .. } | FieldKind::Radio { .. })
    }

    pub fn is_multi_choice(&self) -> bool {
        matches!(self, FieldKind::CheckboxGroup { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Scalar => "scalar",
            FieldKind::Hidden => "hidden",
            FieldKind::Select { .. } => "select",
            FieldKind::Radio { .. } => "radio",
            FieldKind::Checkbox => "checkbox",
            FieldKind::CheckboxGroup { .. } => "checkbox group",
            FieldKind::File => "file",
            FieldKind::Control => "control",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,

    // server-managed or constant; excluded from reset and from being a copy target
    pub read_only: bool,

    // fixed value for CONSTANT columns and the category selector
    pub constant: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            read_only: false,
            constant: None,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn is_file(&self) -> bool {
        self.kind == FieldKind::File
    }

    pub fn is_control(&self) -> bool {
        self.kind == FieldKind::Control || CONTROL_FIELDS.contains(&self.name.as_str())
    }

    /// Part of the fingerprint: everything except file and control fields.
    pub fn is_fingerprinted(&self) -> bool {
        !self.is_file() && !self.is_control()
    }

    /// Stored in drafts: everything except file fields, the category selector
    /// and GPS coordinates. A fix is only meaningful alongside its status line,
    /// which lives in the session.
    pub fn is_persisted(&self) -> bool {
        !self.is_file() && self.name != CATEGORY_FIELD && !GPS_FIELDS.contains(&self.name.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    pub key: PanelKey,
    pub label: String,
    pub fields: Vec<FieldDef>,

    // names cleared by the "reset selected" action
    pub reset_fields: Vec<String>,

    // layout field names eligible for cross-panel copy
    pub copy_fields: Vec<String>,

    // panel whose values "copy from" pulls in
    pub copy_from: Option<PanelKey>,
}

impl PanelConfig {
    pub fn new(key: impl Into<PanelKey>, fields: Vec<FieldDef>) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            fields,
            reset_fields: Vec::new(),
            copy_fields: Vec::new(),
            copy_from: None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
