use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::CycleStatus;

/// Why a reminder session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearReason {
    /// The user started rest -- the only event that permanently silences
    /// a session from the user's side.
    Acknowledged,
    /// The backend reported the user is no longer pending rest (rest was
    /// started on their behalf, or an admin reset the cycle).
    External,
}

/// Every state transition in the reminder layer produces an Event.
/// The CLI prints them; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A work-completion transition was observed and a session armed.
    CompletionDetected {
        username: String,
        zone: String,
        rest_minutes: f64,
        at: DateTime<Utc>,
    },
    /// A reminder was rendered through the presenter.
    ReminderFired {
        username: String,
        reminder_count: u32,
        rest_minutes: f64,
        at: DateTime<Utc>,
    },
    /// The visible alert was suppressed until the next tick.
    ReminderDismissed {
        username: String,
        reminder_count: u32,
        at: DateTime<Utc>,
    },
    /// The backend accepted the start-rest command.
    RestStarted {
        username: String,
        start_time: Option<String>,
        end_time: Option<String>,
        at: DateTime<Utc>,
    },
    /// A session ended.
    SessionCleared {
        username: String,
        reason: ClearReason,
        at: DateTime<Utc>,
    },
    /// A persisted session was picked up after a restart.
    SessionResumed {
        username: String,
        reminder_count: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        username: String,
        status: CycleStatus,
        zone: Option<String>,
        pending_rest: bool,
        reminder_count: u32,
        at: DateTime<Utc>,
    },
}
