//! Orchestration: wires the scheduler to the backend, the store, and the
//! presenter.
//!
//! Single-threaded and tick-driven. Callers (the watch loop) run
//! `poll()` then `tick()` each iteration; applying the authoritative
//! state first is what lets an external clear win over a reminder whose
//! deadline passed during the same iteration. Every session mutation is
//! persisted before the call returns so a reload can resume mid-cycle.

use chrono::{DateTime, Utc};
use log::warn;

use crate::backend::StateBackend;
use crate::error::{BackendError, StoreError};
use crate::events::Event;
use crate::presenter::{reminder_copy, Presenter};
use crate::reminder::ReminderScheduler;
use crate::storage::AckStore;
use crate::zones::ZoneCatalog;

pub struct ReminderService<B: StateBackend, P: Presenter> {
    backend: B,
    presenter: P,
    store: AckStore,
    catalog: ZoneCatalog,
    scheduler: ReminderScheduler,
}

impl<B: StateBackend, P: Presenter> ReminderService<B, P> {
    pub fn new(backend: B, presenter: P, store: AckStore) -> Self {
        Self {
            backend,
            presenter,
            store,
            catalog: ZoneCatalog::builtin(),
            scheduler: ReminderScheduler::new(),
        }
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    /// Startup: pick up a persisted session so a restart resumes the nag
    /// cycle instead of re-prompting from scratch.
    pub fn resume(&mut self, username: &str, now: DateTime<Utc>) -> Result<Option<Event>, StoreError> {
        let Some(session) = self.store.load(username)? else {
            return Ok(None);
        };
        Ok(self.scheduler.restore(session, now))
    }

    /// One poll of the authoritative backend state.
    ///
    /// A transport failure yields no event and leaves any active session
    /// alone: no information is not the same as "user idle".
    pub fn poll(&mut self, username: &str, now: DateTime<Utc>) -> Option<Event> {
        let state = match self.backend.fetch_state(username) {
            Ok(state) => state,
            Err(BackendError::Network(msg)) => {
                warn!("state fetch failed for '{username}', retrying next poll: {msg}");
                return None;
            }
            Err(BackendError::Rejected(msg)) => {
                warn!("state fetch rejected for '{username}': {msg}");
                return None;
            }
        };
        let event = self.scheduler.apply_state(username, &state, &self.catalog, now);
        if let Some(ref event) = event {
            self.persist_after(username, event);
        }
        event
    }

    /// Advance timers. Every due reminder is rendered through the
    /// presenter; delivery failures are logged and swallowed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let fired = self.scheduler.tick(now);
        for event in &fired {
            if let Event::ReminderFired {
                username,
                reminder_count,
                rest_minutes,
                ..
            } = event
            {
                let (title, body) = reminder_copy(*reminder_count, *rest_minutes);
                if let Err(e) = self.presenter.present(&title, &body, true) {
                    warn!("reminder delivery failed for '{username}': {e}");
                }
                self.persist_after(username, event);
            }
        }
        fired
    }

    /// User suppressed the visible alert. The nag cadence survives.
    pub fn dismiss(&mut self, username: &str, now: DateTime<Utc>) -> Option<Event> {
        let event = self.scheduler.dismiss(username, now)?;
        self.presenter.clear();
        self.persist_after(username, &event);
        Some(event)
    }

    /// Acknowledge by starting rest. Local state is cleared only once the
    /// backend accepts the command; a rejection leaves the session intact
    /// so the user can retry.
    pub fn start_rest(
        &mut self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>, BackendError> {
        let started = self.backend.start_rest(username)?;
        let mut events = vec![Event::RestStarted {
            username: username.to_string(),
            start_time: started.start_time,
            end_time: started.end_time,
            at: now,
        }];
        if let Some(cleared) = self.scheduler.acknowledge(username, now) {
            self.persist_after(username, &cleared);
            events.push(cleared);
        } else if let Err(e) = self.store.remove(username) {
            // No live session, but a stale persisted record may remain.
            warn!("failed to clear persisted session for '{username}': {e}");
        }
        self.presenter.clear();
        Ok(events)
    }

    /// Teardown: cancel all timers. Persisted state stays in place so a
    /// later process can resume.
    pub fn stop(&mut self) {
        self.scheduler.stop();
        self.presenter.clear();
    }

    /// Current backend view of a user plus the local reminder count.
    pub fn snapshot(&self, username: &str, now: DateTime<Utc>) -> Result<Event, BackendError> {
        let state = self.backend.fetch_state(username)?;
        Ok(Event::StateSnapshot {
            username: username.to_string(),
            status: state.status,
            zone: state.zone.clone(),
            pending_rest: state.pending_rest,
            reminder_count: self
                .scheduler
                .session(username)
                .map(|s| s.reminder_count)
                .unwrap_or(0),
            at: now,
        })
    }

    fn persist_after(&self, username: &str, event: &Event) {
        let result = match event {
            Event::SessionCleared { .. } => self.store.remove(username),
            _ => match self.scheduler.session(username) {
                Some(session) => self.store.save(session),
                None => Ok(()),
            },
        };
        if let Err(e) = result {
            warn!("failed to persist session state for '{username}': {e}");
        }
    }
}
