// src/command/submit.rs

use crate::command_state::*;
use crate::error::{AppError, AppResult};
use crate::exists::{ExistsCheck, FormPayload};
use crate::json_canon;
use crate::panel::{Panel, ACTION_FIELD, SUBMIT_MODE_FIELD};
use crate::sync_log::{record_fail_open, record_silent_degrade, record_user_decision};
use crate::types::{AppState, FieldValue, Fingerprint, PanelKey};

pub const CHECKING_LABEL: &str = "Checking…";
pub const NEW_RECORD_MARKER: &str = "new";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// no conflict, or the user chose to create a duplicate
    Confirmed,
    /// the user cancelled at a duplicate prompt
    Declined,
    /// the existence check failed; treated as "not a duplicate"
    FailedOpen,
}

#[derive(Clone, Debug)]
pub struct SubmitDecision {
    pub outcome: SubmitOutcome,
    pub fingerprint: Fingerprint,
    pub existing_id: Option<i64>,
    pub payload: FormPayload,
}

impl SubmitDecision {
    pub fn proceeds(&self) -> bool {
        self.outcome != SubmitOutcome::Declined
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DuplicateReason {
    SameAsLastSubmission,
    ExistsOnServer { id: Option<i64> },
}

/// "Already exists; create a duplicate?" Returns `true` to submit anyway.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm_duplicate(&self, panel: &str, reason: &DuplicateReason) -> bool;
}

/// The button that triggers a "new record" submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitControl {
    enabled: bool,
    label: String,
}

impl SubmitControl {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            enabled: true,
            label: label.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn begin_check(&mut self) -> ControlLease<'_> {
        let original = std::mem::replace(&mut self.label, CHECKING_LABEL.to_string());
        self.enabled = false;
        ControlLease {
            control: self,
            original,
        }
    }
}

// Restores label and enabled state on every exit path, including `?` and panics.
struct ControlLease<'a> {
    control: &'a mut SubmitControl,
    original: String,
}

impl Drop for ControlLease<'_> {
    fn drop(&mut self) {
        self.control.label = std::mem::take(&mut self.original);
        self.control.enabled = true;
    }
}

struct InFlightLease<'a> {
    state: &'a AppState,
    panel: PanelKey,
}

impl<'a> InFlightLease<'a> {
    fn acquire(state: &'a AppState, panel: &str) -> AppResult<Self> {
        let mut set = lock_in_flight(state)?;
        if !set.insert(panel.to_string()) {
            return Err(AppError::CheckInFlight(panel.to_string()));
        }
        Ok(Self {
            state,
            panel: panel.to_string(),
        })
    }
}

impl Drop for InFlightLease<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.state.in_flight.lock() {
            set.remove(&self.panel);
        }
    }
}

/// Run one duplicate-check cycle for a "create new record" submission.
///
/// `Err` only when a cycle for this panel is already running; every other
/// path ends in a decision. The caller submits `payload` when
/// [`SubmitDecision::proceeds`] is true.
pub async fn submit_new_record(
    state: &AppState,
    panel: &mut Panel,
    control: &mut SubmitControl,
    client: &dyn ExistsCheck,
    prompt: &dyn ConfirmPrompt,
) -> AppResult<SubmitDecision> {
    let key = panel.key().to_string();

    if !control.is_enabled() {
        return Err(AppError::CheckInFlight(key));
    }
    let _flight = InFlightLease::acquire(state, &key)?;
    let _control = control.begin_check();

    let fingerprint = json_canon::encode(&panel.snapshot());

    mark_new_record(panel);
    let mut payload = FormPayload::from_panel(panel);
    payload.set_marker(ACTION_FIELD, NEW_RECORD_MARKER);
    payload.set_marker(SUBMIT_MODE_FIELD, NEW_RECORD_MARKER);

    let mut decision = SubmitDecision {
        outcome: SubmitOutcome::Confirmed,
        fingerprint,
        existing_id: None,
        payload,
    };

    // local pre-check: prompt before any network call
    let confirmed_locally = if last_accepted(state, &key).as_ref() == Some(&decision.fingerprint)
    {
        if !ask(state, prompt, &key, &DuplicateReason::SameAsLastSubmission) {
            decision.outcome = SubmitOutcome::Declined;
            return Ok(decision);
        }
        true
    } else {
        false
    };

    match client.check(&decision.payload).await {
        Ok(resp) if resp.exists => {
            decision.existing_id = resp.id;
            let reason = DuplicateReason::ExistsOnServer { id: resp.id };
            if !confirmed_locally && !ask(state, prompt, &key, &reason) {
                decision.outcome = SubmitOutcome::Declined;
                return Ok(decision);
            }
        }
        Ok(_) => {}
        Err(e) => {
            record_fail_open(state, &key, &e);
            decision.outcome = SubmitOutcome::FailedOpen;
        }
    }

    remember(state, &key, &decision.fingerprint);
    Ok(decision)
}

fn ask(state: &AppState, prompt: &dyn ConfirmPrompt, panel: &str, reason: &DuplicateReason) -> bool {
    let yes = prompt.confirm_duplicate(panel, reason);

    let what = match reason {
        DuplicateReason::SameAsLastSubmission => "same as last submission".to_string(),
        DuplicateReason::ExistsOnServer { id: Some(id) } => format!("exists on server as #{id}"),
        DuplicateReason::ExistsOnServer { id: None } => "exists on server".to_string(),
    };
    let kind = if yes {
        "duplicate_confirmed"
    } else {
        "duplicate_declined"
    };
    record_user_decision(state, panel, kind, &what);

    yes
}

fn mark_new_record(panel: &mut Panel) {
    for name in [ACTION_FIELD, SUBMIT_MODE_FIELD] {
        if panel.config().field(name).is_some() {
            let _ = panel.write_value(name, FieldValue::Text(NEW_RECORD_MARKER.to_string()));
        }
    }
}

pub fn last_accepted(state: &AppState, panel: &str) -> Option<Fingerprint> {
    match lock_last_accepted(state) {
        Ok(table) => table.get(panel).cloned(),
        Err(e) => {
            record_silent_degrade(state, "submit_new_record", Some(panel), &e);
            None
        }
    }
}

fn remember(state: &AppState, panel: &str, fingerprint: &Fingerprint) {
    match lock_last_accepted(state) {
        Ok(mut table) => {
            table.insert(panel.to_string(), fingerprint.clone());
        }
        Err(e) => {
            record_silent_degrade(state, "submit_new_record", Some(panel), &e);
            return;
        }
    }

    write_last_accepted_best_effort(state, "submit_new_record", Some(panel));
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft_store::MemoryKv;
    use tempfile::tempdir;

    #[test]
    fn control_lease_shows_checking_and_restores_on_drop() {
        let mut c = SubmitControl::new("Save new record");
        {
            let lease = c.begin_check();
            assert_eq!(lease.control.label(), CHECKING_LABEL);
            assert!(!lease.control.is_enabled());
        }
        assert_eq!(c.label(), "Save new record");
        assert!(c.is_enabled());
    }

    #[test]
    fn one_in_flight_cycle_per_panel() {
        let td = tempdir().unwrap();
        let state = AppState::new_for_tests(td.path(), Box::new(MemoryKv::new())).unwrap();

        let first = InFlightLease::acquire(&state, "bag").unwrap();
        assert!(matches!(
            InFlightLease::acquire(&state, "bag"),
            Err(AppError::CheckInFlight(_))
        ));
        let _other = InFlightLease::acquire(&state, "artifact").unwrap();

        drop(first);
        assert!(InFlightLease::acquire(&state, "bag").is_ok());
    }
}
