//! The reminder state machine.
//!
//! ```text
//! Idle -> ArmedFirst --(5s)--> Periodic --(10s, repeating)--> Idle
//! ```
//!
//! Caller-driven: no internal threads and no wall-clock reads -- every
//! transition takes `now`, so the whole transition table is testable
//! without a host environment or a sleep. The scheduler owns one session
//! per username; duplicate completion detections (two polling components
//! racing) land on the same session and never create a second timer
//! chain.
//!
//! Repetition is unbounded on purpose: there is no maximum reminder count
//! and no backoff. The only exits are acknowledgement (the user starts
//! rest) and an external clear (the backend says rest is no longer
//! pending).

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use log::debug;

use super::session::{ReminderPhase, ReminderSession, REMINDER_INTERVAL_SECS};
use crate::backend::UserCycleState;
use crate::events::{ClearReason, Event};
use crate::zones::ZoneCatalog;

#[derive(Debug, Default)]
pub struct ReminderScheduler {
    sessions: HashMap<String, ReminderSession>,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self, username: &str) -> Option<&ReminderSession> {
        self.sessions.get(username)
    }

    pub fn is_active(&self, username: &str) -> bool {
        self.sessions
            .get(username)
            .map(ReminderSession::is_active)
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.sessions.values().filter(|s| s.is_active()).count()
    }

    /// Idle -> ArmedFirst: a work-completion transition was observed.
    ///
    /// Idempotent per username: an active session for the same zone
    /// swallows the duplicate detection. A different zone replaces the
    /// session with a fresh snapshot.
    pub fn observe(
        &mut self,
        username: &str,
        zone: &str,
        rest_minutes: f64,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        if let Some(existing) = self.sessions.get(username) {
            if existing.is_active() && existing.zone == zone {
                return None;
            }
        }
        debug!("arming reminder session for '{username}' in zone '{zone}'");
        let session =
            ReminderSession::new(username.to_string(), zone.to_string(), rest_minutes, now);
        self.sessions.insert(username.to_string(), session);
        Some(Event::CompletionDetected {
            username: username.to_string(),
            zone: zone.to_string(),
            rest_minutes,
            at: now,
        })
    }

    /// Poll input: route an authoritative state report. A report that no
    /// longer needs rest clears any active session -- the newest backend
    /// state always wins over a reminder already in flight.
    pub fn apply_state(
        &mut self,
        username: &str,
        state: &UserCycleState,
        catalog: &ZoneCatalog,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        let zone = match state.zone.as_deref() {
            Some(zone) if state.needs_rest() => zone,
            _ => return self.external_clear(username, now),
        };
        let rest_zone = state.rest_zone().unwrap_or(zone);
        let rest_minutes = catalog.rest_minutes_for(rest_zone);
        self.observe(username, zone, rest_minutes, now)
    }

    /// Fire every session whose deadline has passed and re-arm the fixed
    /// cadence. At most one reminder fires per session per tick, however
    /// late the deadline is.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut fired = Vec::new();
        for session in self.sessions.values_mut() {
            if !session.is_active() {
                continue;
            }
            let Some(due) = session.next_due_at else {
                continue;
            };
            if due > now {
                continue;
            }
            session.reminder_count += 1;
            session.phase = ReminderPhase::Periodic;
            session.next_due_at = Some(now + Duration::seconds(REMINDER_INTERVAL_SECS));
            fired.push(Event::ReminderFired {
                username: session.username.clone(),
                reminder_count: session.reminder_count,
                rest_minutes: session.rest_minutes,
                at: now,
            });
        }
        fired
    }

    /// Suppress the currently visible alert until the next tick. Does not
    /// exit the nag loop: the count survives and the cadence re-arms.
    pub fn dismiss(&mut self, username: &str, now: DateTime<Utc>) -> Option<Event> {
        let session = self.sessions.get_mut(username)?;
        if !session.is_active() {
            return None;
        }
        session.dismissed_at = now;
        session.next_due_at = Some(now + Duration::seconds(REMINDER_INTERVAL_SECS));
        Some(Event::ReminderDismissed {
            username: username.to_string(),
            reminder_count: session.reminder_count,
            at: now,
        })
    }

    /// Acknowledgement: the user started rest. Cancels everything for the
    /// session. Safe to call with no active session.
    pub fn acknowledge(&mut self, username: &str, now: DateTime<Utc>) -> Option<Event> {
        self.clear(username, ClearReason::Acknowledged, now)
    }

    /// The backend reports the user is no longer pending rest. Cancels any
    /// timer already in flight; no reminder is shown.
    pub fn external_clear(&mut self, username: &str, now: DateTime<Utc>) -> Option<Event> {
        self.clear(username, ClearReason::External, now)
    }

    fn clear(&mut self, username: &str, reason: ClearReason, now: DateTime<Utc>) -> Option<Event> {
        self.sessions.remove(username).map(|_| {
            debug!("cleared reminder session for '{username}' ({reason:?})");
            Event::SessionCleared {
                username: username.to_string(),
                reason,
                at: now,
            }
        })
    }

    /// Re-admit a persisted session after a reload. A deadline that
    /// elapsed while the process was down becomes "due now": exactly one
    /// reminder fires on the next tick, never a backlog.
    pub fn restore(&mut self, mut session: ReminderSession, now: DateTime<Utc>) -> Option<Event> {
        if !session.is_active() {
            return None;
        }
        session.rearm_after_restore(now);
        let event = Event::SessionResumed {
            username: session.username.clone(),
            reminder_count: session.reminder_count,
            at: now,
        };
        self.sessions.insert(session.username.clone(), session);
        Some(event)
    }

    /// Teardown: drop every session and its timers without events.
    pub fn stop(&mut self) {
        self.sessions.clear();
    }
}
