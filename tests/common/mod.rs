// tests/common/mod.rs

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use artcap_form_sync_lib::{
    command::{self, ConfirmPrompt, DuplicateReason},
    error::{AppError, AppResult},
    exists::{ExistsCheck, ExistsResponse, FormPayload},
    panel::{parse_panel_config, FieldEdit, FormBook, Panel},
    types::AppState,
};

pub const PANELS_JSON: &str = r#"{
  "panels": {
    "bag": {
      "label": "Bag",
      "input_fields": [
        ["Recorder", "recorder", "TEXT", "RADIO('Alice','Bob')"],
        ["Season", "season", "TEXT", "DROPDOWN('2023','2024')"],
        ["Treatment", "treatment", "TEXT", "CHECKBOX('slip','paint','cord')"],
        ["Context", "context"],
        ["Notes", "notes"],
        ["Recorded", "date_recorded", "TIMESTAMP"]
      ],
      "layout_rows": [["recorder", "season"], ["treatment", "context"], ["notes"]],
      "fields_to_reset": ["notes", "treatment"]
    },
    "artifact": {
      "input_fields": [
        ["Recorder", "recorder", "TEXT", "RADIO('Alice','Bob')"],
        ["Season", "season", "TEXT", "DROPDOWN('2023','2024')"],
        ["Treatment", "treatment", "TEXT", "CHECKBOX('paint','slip')"],
        ["Context", "context"],
        ["Material", "material"],
        ["Recorded", "date_recorded", "TIMESTAMP"]
      ],
      "layout_rows": [
        ["recorder", "season"],
        ["treatment", "context"],
        ["date_recorded", "action", "photo", "shelf"]
      ],
      "copy_from": "bag"
    },
    "sample": {
      "input_fields": [
        ["Context", "context"],
        ["Season", "season", "TEXT", "DROPDOWN('2023','2024')"]
      ],
      "layout_rows": [["context", "season"]],
      "copy_from": "bag",
      "readonly": ["context"]
    }
  }
}"#;

pub fn book() -> FormBook {
    FormBook::new(parse_panel_config(PANELS_JSON).expect("panels config"))
}

pub struct TestEnv {
    // Keep the tempdir alive for the duration of the test.
    td: tempfile::TempDir,

    pub state: AppState,
    pub book: FormBook,
}

impl TestEnv {
    /// File-backed state in a fresh tempdir, panels restored from drafts.
    pub fn new() -> Self {
        let td = tempfile::tempdir().expect("tempdir");
        let state = artcap_form_sync_lib::init_state(td.path()).expect("init_state");
        let mut book = book();
        command::restore_book(&state, &mut book);

        Self { td, state, book }
    }

    /// Simulated reload: state and panels rebuilt from the same data dir.
    pub fn restart(self) -> Self {
        let Self { td, state, book: _ } = self;
        drop(state);

        let state = artcap_form_sync_lib::init_state(td.path()).expect("init_state");
        let mut book = book();
        command::restore_book(&state, &mut book);

        Self { td, state, book }
    }

    pub fn data_dir(&self) -> &std::path::Path {
        self.td.path()
    }

    pub fn panel(&mut self, key: &str) -> &mut Panel {
        self.book.panel_mut(key).expect("panel")
    }

    pub fn edit(&mut self, panel: &str, field: &str, edit: FieldEdit) {
        let p = self.book.panel_mut(panel).expect("panel");
        command::on_field_change(&self.state, p, field, edit).expect("edit");
    }

    pub fn set(&mut self, panel: &str, field: &str, value: &str) {
        self.edit(panel, field, FieldEdit::Set(value.to_string()));
    }

    pub fn toggle(&mut self, panel: &str, field: &str, option: &str, checked: bool) {
        self.edit(
            panel,
            field,
            FieldEdit::Toggle {
                option: option.to_string(),
                checked,
            },
        );
    }
}

/// Fill the `bag` panel with the reference scenario values.
pub fn fill_bag(env: &mut TestEnv, treatment_order: &[&str]) {
    env.set("bag", "recorder", "Alice");
    env.set("bag", "season", "2024");
    for t in treatment_order {
        env.toggle("bag", "treatment", t, true);
    }
}

// ======================================================
// scripted collaborators
// ======================================================

#[derive(Clone, Debug)]
pub enum Reply {
    Absent,
    Exists(Option<i64>),
    Transport,
    Status(u16),
    Malformed,
}

/// Existence check that replays `Reply`s in order; `Absent` once exhausted.
#[derive(Default)]
pub struct FakeExists {
    script: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    last_payload: Mutex<Option<FormPayload>>,
}

impl FakeExists {
    pub fn replying(replies: &[Reply]) -> Self {
        Self {
            script: Mutex::new(replies.iter().cloned().collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<FormPayload> {
        self.last_payload.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExistsCheck for FakeExists {
    async fn check(&self, payload: &FormPayload) -> AppResult<ExistsResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some(payload.clone());

        let reply = self.script.lock().unwrap().pop_front().unwrap_or(Reply::Absent);
        match reply {
            Reply::Absent => Ok(ExistsResponse { exists: false, id: None }),
            Reply::Exists(id) => Ok(ExistsResponse { exists: true, id }),
            Reply::Transport => Err(AppError::ExistsTransport("connection refused".into())),
            Reply::Status(code) => Err(AppError::ExistsStatus(code)),
            Reply::Malformed => Err(AppError::ExistsMalformed("missing boolean `exists`".into())),
        }
    }
}

/// Prompt that answers from a queue (`false` once exhausted) and records questions.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<DuplicateReason>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<DuplicateReason> {
        self.asked.lock().unwrap().clone()
    }
}

impl ConfirmPrompt for ScriptedPrompt {
    fn confirm_duplicate(&self, _panel: &str, reason: &DuplicateReason) -> bool {
        self.asked.lock().unwrap().push(reason.clone());
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}
