// src/types.rs

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft_store::KvStore;
use crate::sync_log::SyncLog;

pub type PanelKey = String;

/// A single field value as held by a panel and as persisted in drafts.
///
/// Serializes untagged: `true`, `"text"`, or `["a","b"]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Choices(Vec<String>),
}

impl FieldValue {
    pub fn empty_text() -> Self {
        FieldValue::Text(String::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Selected options viewed as a set. A non-empty text counts as one selection.
    pub fn as_choice_set(&self) -> BTreeSet<String> {
        match self {
            FieldValue::Choices(v) => v.iter().cloned().collect(),
            FieldValue::Text(s) if !s.is_empty() => std::iter::once(s.clone()).collect(),
            _ => BTreeSet::new(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Flag(b) => Value::Bool(*b),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Choices(v) => Value::Array(v.iter().cloned().map(Value::String).collect()),
        }
    }
}

/// Canonical string form of a panel snapshot. Compared by exact equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub(crate) fn from_canonical(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub type PanelValues = BTreeMap<String, FieldValue>;
pub type PersistedValues = BTreeMap<PanelKey, PanelValues>;
pub type LastAccepted = BTreeMap<PanelKey, Fingerprint>;

pub struct AppState {
    // durable key/value backend (drafts + last-accepted fingerprints)
    pub store: Mutex<Box<dyn KvStore>>,

    // in-memory copies; authoritative for the session even if writes fail
    pub drafts: Mutex<PersistedValues>,
    pub last_accepted: Mutex<LastAccepted>,

    // panels with a duplicate-check cycle in flight
    pub in_flight: Mutex<BTreeSet<PanelKey>>,

    // best-effort event log of silent degrades / fail-open decisions
    pub sync_log: Mutex<SyncLog>,
}
