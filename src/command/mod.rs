// src/command/mod.rs

pub mod copy;
pub mod drafts;
pub mod reset;
pub mod submit;

// --- Public façade ---

pub use copy::{copy_into, CopyReport};
pub use drafts::{load, on_field_change, persist_panel, restore, restore_book};
pub use reset::{reset, ResetReport, ResetScope};
pub use submit::{
    last_accepted, submit_new_record, ConfirmPrompt, DuplicateReason, SubmitControl,
    SubmitDecision, SubmitOutcome, CHECKING_LABEL, NEW_RECORD_MARKER,
};
