// src/panel/mod.rs

mod book;
pub mod config;
mod state;
mod types;

pub use book::FormBook;
pub use config::{load_panel_config, parse_panel_config};
pub use state::{FieldEdit, GpsFix, Panel, PanelState};
pub use types::{
    FieldDef, FieldKind, PanelConfig, ACTION_FIELD, CATEGORY_FIELD, CONTROL_FIELDS, GPS_FIELDS,
    GPS_STATUS_PROMPT, PHOTO_FIELD, SUBMIT_MODE_FIELD,
};

pub(crate) use state::initial_value;
