//! Backend contract.
//!
//! The server owns all authoritative cycle state -- zone assignments,
//! timings, pending-rest flags. This module defines the wire types and the
//! trait seam; the reminder layer only ever reads state and issues the
//! start-rest command through it.

mod http;

pub use http::HttpBackend;

use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Where a user is in the work/rest cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleStatus {
    Working,
    Resting,
    /// Unrecognized statuses collapse to idle: no cycle to remind about.
    #[default]
    #[serde(other)]
    Idle,
}

/// Authoritative cycle state for one user, read-only on this side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserCycleState {
    #[serde(default)]
    pub status: CycleStatus,
    #[serde(default)]
    pub zone: Option<String>,
    /// Harshest zone seen during the current cycle, if the backend tracked
    /// one. Governs the rest duration, not the display zone.
    #[serde(default)]
    pub most_stringent_zone: Option<String>,
    /// Backend-formatted %H:%M:%S strings, display-only.
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub work_completed: bool,
    #[serde(default)]
    pub pending_rest: bool,
}

impl UserCycleState {
    /// The alert trigger: the timed work interval ended and the paired
    /// rest has not started.
    pub fn needs_rest(&self) -> bool {
        self.work_completed && self.pending_rest && self.zone.is_some()
    }

    /// Zone whose rest duration applies, preferring the harshest seen.
    pub fn rest_zone(&self) -> Option<&str> {
        self.most_stringent_zone.as_deref().or(self.zone.as_deref())
    }
}

/// Success payload of the start-rest command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestStarted {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// The user-state accessor. Production uses [`HttpBackend`]; tests inject
/// scripted fakes.
pub trait StateBackend {
    /// Current cycle state for a user.
    fn fetch_state(&self, username: &str) -> Result<UserCycleState, BackendError>;

    /// Transition a user from "work complete, pending rest" to "resting".
    fn start_rest(&self, username: &str) -> Result<RestStarted, BackendError>;

    /// Backend clock, epoch seconds. Display-only: the reminder machine
    /// works in session-relative durations and never needs it.
    fn server_time(&self) -> Result<i64, BackendError>;
}
