// src/error.rs

use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserMsgKind {
    Success,
    Warn,
    Error,
    Info,
}

#[derive(Clone, Debug)]
pub struct UserMsg {
    pub kind: UserMsgKind,
    pub short: &'static str,
    pub detail: Option<String>,
}

#[derive(Debug)]
pub enum AppError {
    // --------------------------------------------------
    // generic / plumbing
    // --------------------------------------------------
    Io(std::io::Error),
    Msg(String),
    StateLockPoisoned,

    // --------------------------------------------------
    // durable store (drafts / last-accepted fingerprints)
    // --------------------------------------------------
    StoreInvalidKey(String),
    StoreReadFailed(String),
    StoreInvalidJson(String),
    StoreShapeInvalid(String),
    StoreTooLarge { bytes: u64, max: u64 },
    StoreQuotaExceeded { bytes: usize, max: usize },
    StoreWriteFailed(String),
    StoreSyncFailed(String),
    StoreRenameFailed(String),

    // --------------------------------------------------
    // panel configuration / field edits
    // --------------------------------------------------
    PanelConfigRead(String),
    PanelConfigTooLarge,
    PanelConfigInvalid(String),
    WidgetSpecInvalid(String),
    UnknownPanel(String),
    UnknownField { panel: String, field: String },
    UnknownOption { field: String, option: String },
    FieldReadOnly(String),
    FieldKindMismatch { field: String, expected: &'static str },
    CopySourceNotConfigured(String),

    // --------------------------------------------------
    // existence check
    // --------------------------------------------------
    ExistsEndpointInvalid(String),
    ExistsClientInit(String),
    ExistsTransport(String),
    ExistsStatus(u16),
    ExistsMalformed(String),
    CheckInFlight(String),
}

impl AppError {
    /// Short message for display; `detail` carries the full error only when `debug`.
    pub fn user_msg(&self, debug: bool) -> UserMsg {
        use AppError::*;

        let mut kind = UserMsgKind::Error;
        let detail = debug.then(|| self.to_string());

        let short: &'static str = match self {
            // generic
            Io(_) => "File operation failed.",
            Msg(_) => "Operation failed.",
            StateLockPoisoned => "Internal state lock failed.",

            // store
            StoreInvalidKey(_) => "Invalid draft storage key.",
            StoreReadFailed(_) => "Failed to read saved drafts.",
            StoreInvalidJson(_) | StoreShapeInvalid(_) => {
                kind = UserMsgKind::Warn;
                "Saved drafts were unreadable and have been ignored."
            }
            StoreTooLarge { .. } => "Saved drafts are too large.",
            StoreQuotaExceeded { .. } => {
                kind = UserMsgKind::Warn;
                "Draft storage is full; changes are kept for this session only."
            }
            StoreWriteFailed(_) | StoreSyncFailed(_) | StoreRenameFailed(_) => {
                kind = UserMsgKind::Warn;
                "Failed to save draft; changes are kept for this session only."
            }

            // panel configuration
            PanelConfigRead(_) => "Failed to read panel configuration.",
            PanelConfigTooLarge => "Panel configuration is too large.",
            PanelConfigInvalid(_) => "Panel configuration is invalid.",
            WidgetSpecInvalid(_) => "Invalid widget definition in panel configuration.",
            UnknownPanel(_) => "Unknown record type.",
            UnknownField { .. } => "Unknown field.",
            UnknownOption { .. } => "Unknown option.",
            FieldReadOnly(_) => "Field is read-only.",
            FieldKindMismatch { .. } => "Field does not accept this value.",
            CopySourceNotConfigured(_) => {
                kind = UserMsgKind::Info;
                "Nothing to copy for this record type."
            }

            // existence check
            ExistsEndpointInvalid(_) => "Invalid duplicate-check address.",
            ExistsClientInit(_) => "Duplicate check unavailable.",
            ExistsTransport(_) | ExistsStatus(_) | ExistsMalformed(_) => {
                kind = UserMsgKind::Warn;
                "Duplicate check unavailable; record was saved anyway."
            }
            CheckInFlight(_) => {
                kind = UserMsgKind::Info;
                "Duplicate check already in progress."
            }
        };

        UserMsg {
            kind,
            short,
            detail,
        }
    }

    /// Network faults that the duplicate guard converts into fail-open.
    pub fn is_exists_check_fault(&self) -> bool {
        matches!(
            self,
            AppError::ExistsTransport(_) | AppError::ExistsStatus(_) | AppError::ExistsMalformed(_)
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AppError::*;

        match self {
            Io(e) => write!(f, "io error: {e}"),
            Msg(s) => write!(f, "{s}"),
            StateLockPoisoned => write!(f, "state lock poisoned"),

            StoreInvalidKey(k) => write!(f, "invalid store key: {k:?}"),
            StoreReadFailed(s) => write!(f, "store read failed: {s}"),
            StoreInvalidJson(s) => write!(f, "store invalid json: {s}"),
            StoreShapeInvalid(s) => write!(f, "store payload has unexpected shape: {s}"),
            StoreTooLarge { bytes, max } => write!(f, "store entry too large: {bytes} > {max}"),
            StoreQuotaExceeded { bytes, max } => {
                write!(f, "store quota exceeded: {bytes} > {max}")
            }
            StoreWriteFailed(s) => write!(f, "store write failed: {s}"),
            StoreSyncFailed(s) => write!(f, "store sync failed: {s}"),
            StoreRenameFailed(s) => write!(f, "store rename failed: {s}"),

            PanelConfigRead(s) => write!(f, "panel config read failed: {s}"),
            PanelConfigTooLarge => write!(f, "panel config too large"),
            PanelConfigInvalid(s) => write!(f, "panel config invalid: {s}"),
            WidgetSpecInvalid(s) => write!(f, "invalid widget spec: {s}"),
            UnknownPanel(p) => write!(f, "unknown panel: {p}"),
            UnknownField { panel, field } => write!(f, "unknown field {field} in panel {panel}"),
            UnknownOption { field, option } => {
                write!(f, "unknown option {option:?} for field {field}")
            }
            FieldReadOnly(field) => write!(f, "field is read-only: {field}"),
            FieldKindMismatch { field, expected } => {
                write!(f, "field {field} expects a {expected} edit")
            }
            CopySourceNotConfigured(p) => write!(f, "no copy source configured for panel {p}"),

            ExistsEndpointInvalid(s) => write!(f, "invalid exists endpoint: {s}"),
            ExistsClientInit(s) => write!(f, "exists client init failed: {s}"),
            ExistsTransport(s) => write!(f, "exists check transport error: {s}"),
            ExistsStatus(code) => write!(f, "exists check returned status {code}"),
            ExistsMalformed(s) => write!(f, "exists check response malformed: {s}"),
            CheckInFlight(p) => write!(f, "duplicate check already in flight for panel {p}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}
