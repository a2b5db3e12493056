//! End-to-end reminder flow against a scripted backend and a recording
//! presenter. Clocks are injected; nothing here sleeps.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use restcycle_core::{
    AckStore, BackendError, ClearReason, CycleStatus, Event, PresentError, Presenter,
    ReminderService, RestStarted, StateBackend, UserCycleState,
};

/// Backend fake: serves a programmable state, or a network failure when
/// taken offline.
#[derive(Clone, Default)]
struct ScriptedBackend {
    state: Arc<Mutex<Option<UserCycleState>>>,
    reject_rest: Arc<Mutex<bool>>,
}

impl ScriptedBackend {
    fn set_state(&self, state: UserCycleState) {
        *self.state.lock().unwrap() = Some(state);
    }

    fn set_offline(&self) {
        *self.state.lock().unwrap() = None;
    }

    fn set_reject_rest(&self, reject: bool) {
        *self.reject_rest.lock().unwrap() = reject;
    }
}

impl StateBackend for ScriptedBackend {
    fn fetch_state(&self, _username: &str) -> Result<UserCycleState, BackendError> {
        self.state
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| BackendError::Network("connection refused".into()))
    }

    fn start_rest(&self, _username: &str) -> Result<RestStarted, BackendError> {
        if *self.reject_rest.lock().unwrap() {
            return Err(BackendError::Rejected("already resting".into()));
        }
        if let Some(state) = self.state.lock().unwrap().as_mut() {
            state.status = CycleStatus::Resting;
            state.work_completed = false;
            state.pending_rest = false;
        }
        Ok(RestStarted {
            start_time: Some("12:00:30".into()),
            end_time: Some("12:00:40".into()),
        })
    }

    fn server_time(&self) -> Result<i64, BackendError> {
        Ok(0)
    }
}

#[derive(Clone, Default)]
struct RecordingPresenter {
    shown: Arc<Mutex<Vec<(String, String)>>>,
    cleared: Arc<Mutex<u32>>,
}

impl Presenter for RecordingPresenter {
    fn name(&self) -> &str {
        "recording"
    }

    fn present(&self, title: &str, body: &str, _require_ack: bool) -> Result<(), PresentError> {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }

    fn clear(&self) {
        *self.cleared.lock().unwrap() += 1;
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
}

fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

fn pending_state(zone: &str) -> UserCycleState {
    UserCycleState {
        status: CycleStatus::Working,
        zone: Some(zone.to_string()),
        most_stringent_zone: None,
        start_time: Some("11:59:53".into()),
        end_time: Some("12:00:00".into()),
        work_completed: true,
        pending_rest: true,
    }
}

type TestService = ReminderService<ScriptedBackend, RecordingPresenter>;

fn service_with_memory_store() -> (TestService, ScriptedBackend, RecordingPresenter) {
    let backend = ScriptedBackend::default();
    let presenter = RecordingPresenter::default();
    let store = AckStore::open_memory().unwrap();
    let service = ReminderService::new(backend.clone(), presenter.clone(), store);
    (service, backend, presenter)
}

/// Drive one second of the watch loop: poll, then tick.
fn step(service: &mut TestService, second: i64) -> Vec<Event> {
    let now = at(second);
    let mut events = Vec::new();
    events.extend(service.poll("alice", now));
    events.extend(service.tick(now));
    events
}

#[test]
fn test_zone_completion_nags_until_acknowledged() {
    let (mut service, backend, presenter) = service_with_memory_store();
    backend.set_state(pending_state("test"));

    let mut fire_offsets = Vec::new();
    for s in 0..=29 {
        for event in step(&mut service, s) {
            if matches!(event, Event::ReminderFired { .. }) {
                fire_offsets.push(s);
            }
        }
    }
    assert_eq!(fire_offsets, vec![5, 15, 25]);

    let shown = presenter.shown.lock().unwrap().clone();
    assert_eq!(shown.len(), 3);
    assert_eq!(shown[0].0, "Work Cycle Complete!");
    for (_, body) in &shown {
        assert!(body.contains("10 seconds"), "body was: {body}");
    }

    // Acknowledge at +30s.
    let events = service.start_rest("alice", at(30)).unwrap();
    assert!(matches!(events[0], Event::RestStarted { .. }));
    assert!(matches!(
        events[1],
        Event::SessionCleared {
            reason: ClearReason::Acknowledged,
            ..
        }
    ));
    assert!(*presenter.cleared.lock().unwrap() > 0);

    // No further reminders, ever.
    for s in 31..=90 {
        for event in step(&mut service, s) {
            assert!(
                !matches!(event, Event::ReminderFired { .. }),
                "reminder fired after acknowledgement at +{s}s"
            );
        }
    }
    assert_eq!(presenter.shown.lock().unwrap().len(), 3);
}

#[test]
fn network_outage_keeps_the_nag_loop_running() {
    let (mut service, backend, presenter) = service_with_memory_store();
    backend.set_state(pending_state("red"));

    for s in 0..=5 {
        step(&mut service, s);
    }
    assert_eq!(presenter.shown.lock().unwrap().len(), 1);

    // Backend goes away: polls return nothing, the session survives and
    // the cadence keeps firing.
    backend.set_offline();
    let mut fire_offsets = Vec::new();
    for s in 6..=35 {
        for event in step(&mut service, s) {
            if matches!(event, Event::ReminderFired { .. }) {
                fire_offsets.push(s);
            }
        }
    }
    assert_eq!(fire_offsets, vec![15, 25, 35]);
    assert!(service.scheduler().is_active("alice"));
}

#[test]
fn external_clear_ends_the_session_silently() {
    let (mut service, backend, presenter) = service_with_memory_store();
    backend.set_state(pending_state("red"));

    for s in 0..=5 {
        step(&mut service, s);
    }
    assert!(service.scheduler().is_active("alice"));

    // An admin resets the cycle: pending_rest drops on the backend.
    let mut state = pending_state("red");
    state.work_completed = false;
    state.pending_rest = false;
    state.status = CycleStatus::Resting;
    backend.set_state(state);

    let events = step(&mut service, 6);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::SessionCleared {
            reason: ClearReason::External,
            ..
        }
    )));
    assert!(!service.scheduler().is_active("alice"));

    for s in 7..=40 {
        step(&mut service, s);
    }
    assert_eq!(presenter.shown.lock().unwrap().len(), 1);
}

#[test]
fn rejected_start_rest_leaves_the_session_intact() {
    let (mut service, backend, presenter) = service_with_memory_store();
    backend.set_state(pending_state("red"));
    backend.set_reject_rest(true);

    for s in 0..=5 {
        step(&mut service, s);
    }

    let err = service.start_rest("alice", at(6)).unwrap_err();
    assert!(matches!(err, BackendError::Rejected(_)));
    assert!(service.scheduler().is_active("alice"));

    // The cadence is untouched by the failed command.
    let mut fired = 0;
    for s in 7..=15 {
        for event in step(&mut service, s) {
            if matches!(event, Event::ReminderFired { .. }) {
                fired += 1;
            }
        }
    }
    assert_eq!(fired, 1);
    assert_eq!(presenter.shown.lock().unwrap().len(), 2);
}

#[test]
fn dismiss_suppresses_without_exiting_the_loop() {
    let (mut service, backend, _presenter) = service_with_memory_store();
    backend.set_state(pending_state("red"));

    for s in 0..=5 {
        step(&mut service, s);
    }

    let event = service.dismiss("alice", at(7)).unwrap();
    assert!(matches!(event, Event::ReminderDismissed { reminder_count: 1, .. }));

    let mut fire_offsets = Vec::new();
    for s in 8..=30 {
        for event in step(&mut service, s) {
            if let Event::ReminderFired { reminder_count, .. } = event {
                fire_offsets.push((s, reminder_count));
            }
        }
    }
    // 10s after the dismissal, then every 10s; the count never resets.
    assert_eq!(fire_offsets, vec![(17, 2), (27, 3)]);
}

#[test]
fn restart_resumes_with_exactly_one_catchup_reminder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ack.db");

    let backend = ScriptedBackend::default();
    backend.set_state(pending_state("red"));

    // First process: two reminders fire, then the process dies.
    {
        let presenter = RecordingPresenter::default();
        let store = AckStore::open_at(&path).unwrap();
        let mut service = ReminderService::new(backend.clone(), presenter, store);
        for s in 0..=15 {
            step(&mut service, s);
        }
        assert_eq!(
            service.scheduler().session("alice").unwrap().reminder_count,
            2
        );
    }

    // Second process, 20s of wall-clock later.
    let presenter = RecordingPresenter::default();
    let store = AckStore::open_at(&path).unwrap();
    let mut service = ReminderService::new(backend, presenter.clone(), store);

    let resumed = service.resume("alice", at(35)).unwrap().unwrap();
    assert!(matches!(resumed, Event::SessionResumed { reminder_count: 2, .. }));

    // Exactly one catch-up fire, not one per missed boundary.
    let fired = service.tick(at(35));
    assert_eq!(fired.len(), 1);
    assert!(matches!(fired[0], Event::ReminderFired { reminder_count: 3, .. }));
    assert!(service.tick(at(36)).is_empty());

    // The cadence then continues from the catch-up fire.
    let fired = service.tick(at(45));
    assert_eq!(fired.len(), 1);
    assert_eq!(presenter.shown.lock().unwrap().len(), 2);
}

#[test]
fn snapshot_combines_backend_state_and_local_count() {
    let (mut service, backend, _presenter) = service_with_memory_store();
    backend.set_state(pending_state("red"));
    for s in 0..=5 {
        step(&mut service, s);
    }

    let snap = service.snapshot("alice", at(6)).unwrap();
    match snap {
        Event::StateSnapshot {
            status,
            zone,
            pending_rest,
            reminder_count,
            ..
        } => {
            assert_eq!(status, CycleStatus::Working);
            assert_eq!(zone.as_deref(), Some("red"));
            assert!(pending_rest);
            assert_eq!(reminder_count, 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn duplicate_poll_sources_share_one_session() {
    let (mut service, backend, _presenter) = service_with_memory_store();
    backend.set_state(pending_state("red"));

    // Two polls land in the same second (two polling components racing).
    let first = service.poll("alice", t0());
    let second = service.poll("alice", t0());
    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(service.scheduler().active_count(), 1);
}

#[test]
fn stop_cancels_timers_but_keeps_the_persisted_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ack.db");
    let backend = ScriptedBackend::default();
    backend.set_state(pending_state("red"));
    let store = AckStore::open_at(&path).unwrap();
    let mut service = ReminderService::new(backend, RecordingPresenter::default(), store);

    for s in 0..=5 {
        step(&mut service, s);
    }
    service.stop();
    assert!(service.tick(at(20)).is_empty());

    // A later process can still resume from what was persisted.
    let store = AckStore::open_at(&path).unwrap();
    let session = store.load("alice").unwrap().unwrap();
    assert_eq!(session.reminder_count, 1);
}

#[test]
fn start_rest_clears_stale_persisted_record_without_live_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ack.db");

    // A previous run left a record behind.
    {
        let store = AckStore::open_at(&path).unwrap();
        let backend = ScriptedBackend::default();
        backend.set_state(pending_state("red"));
        let mut service = ReminderService::new(backend, RecordingPresenter::default(), store);
        for s in 0..=5 {
            step(&mut service, s);
        }
    }

    // A fresh process issues start-rest without resuming first.
    let backend = ScriptedBackend::default();
    backend.set_state(pending_state("red"));
    let store = AckStore::open_at(&path).unwrap();
    let mut service = ReminderService::new(backend, RecordingPresenter::default(), store);
    service.start_rest("alice", t0()).unwrap();

    let store = AckStore::open_at(&path).unwrap();
    assert!(store.load("alice").unwrap().is_none());
}
