use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Delay before the first reminder after a completion is detected.
pub const FIRST_REMINDER_DELAY_SECS: i64 = 5;
/// Fixed cadence of repeat reminders until acknowledgement.
pub const REMINDER_INTERVAL_SECS: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderPhase {
    /// Session created, first reminder not yet fired.
    ArmedFirst,
    /// First reminder fired, recurring cadence active.
    Periodic,
    /// Session ended. Never persisted; cleared sessions are removed.
    Cleared,
}

/// One user's nag cycle.
///
/// This exact struct is the persisted record: overwritten wholesale on
/// every mutation, removed entirely when the session clears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderSession {
    pub username: String,
    pub zone: String,
    /// Rest duration snapshotted from the catalog at creation -- not
    /// re-read on every reminder.
    pub rest_minutes: f64,
    /// Last dismissal, or session creation if never dismissed.
    pub dismissed_at: DateTime<Utc>,
    /// Reminders fired so far.
    pub reminder_count: u32,
    pub phase: ReminderPhase,
    /// The single outstanding deadline. Re-arming overwrites it, which is
    /// what keeps duplicate timer chains impossible.
    #[serde(skip)]
    pub(crate) next_due_at: Option<DateTime<Utc>>,
}

impl ReminderSession {
    pub(crate) fn new(username: String, zone: String, rest_minutes: f64, now: DateTime<Utc>) -> Self {
        Self {
            username,
            zone,
            rest_minutes,
            dismissed_at: now,
            reminder_count: 0,
            phase: ReminderPhase::ArmedFirst,
            next_due_at: Some(now + Duration::seconds(FIRST_REMINDER_DELAY_SECS)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != ReminderPhase::Cleared
    }

    fn current_delay(&self) -> Duration {
        match self.phase {
            ReminderPhase::ArmedFirst => Duration::seconds(FIRST_REMINDER_DELAY_SECS),
            _ => Duration::seconds(REMINDER_INTERVAL_SECS),
        }
    }

    /// Recompute the deadline after a reload. Wall-clock time missed while
    /// the process was down collapses to "due now": one reminder, not a
    /// backlog of every boundary crossed in between.
    pub(crate) fn rearm_after_restore(&mut self, now: DateTime<Utc>) {
        let due = self.dismissed_at + self.current_delay();
        self.next_due_at = Some(if due <= now { now } else { due });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
    }

    #[test]
    fn new_session_arms_first_reminder_after_delay() {
        let session = ReminderSession::new("alice".into(), "red".into(), 30.0, t0());
        assert_eq!(session.phase, ReminderPhase::ArmedFirst);
        assert_eq!(session.reminder_count, 0);
        assert_eq!(session.dismissed_at, t0());
        assert_eq!(session.next_due_at, Some(t0() + Duration::seconds(5)));
    }

    #[test]
    fn restore_of_stale_session_is_due_immediately() {
        let mut session = ReminderSession::new("alice".into(), "red".into(), 30.0, t0());
        session.phase = ReminderPhase::Periodic;
        session.next_due_at = None;
        let later = t0() + Duration::seconds(20);
        session.rearm_after_restore(later);
        assert_eq!(session.next_due_at, Some(later));
    }

    #[test]
    fn restore_of_fresh_session_keeps_original_deadline() {
        let mut session = ReminderSession::new("alice".into(), "red".into(), 30.0, t0());
        session.next_due_at = None;
        let shortly = t0() + Duration::seconds(2);
        session.rearm_after_restore(shortly);
        assert_eq!(session.next_due_at, Some(t0() + Duration::seconds(5)));
    }

    #[test]
    fn persisted_form_omits_the_deadline() {
        let session = ReminderSession::new("alice".into(), "red".into(), 30.0, t0());
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("next_due_at").is_none());
        let back: ReminderSession = serde_json::from_value(json).unwrap();
        assert_eq!(back.next_due_at, None);
    }
}
