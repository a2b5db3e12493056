//! # Restcycle Core Library
//!
//! Client-side reminder policy for a shift-based work/rest cycle tracker.
//! The backend owns all authoritative state (zone assignments, cycle
//! timings, pending-rest flags); this library owns exactly one thing: the
//! rules for nagging a user whose timed work interval has ended until
//! they acknowledge by starting rest.
//!
//! ## Architecture
//!
//! - **Reminder Scheduler**: a clock-injected state machine that requires
//!   the caller to periodically invoke `tick()` -- no internal threads
//! - **Storage**: SQLite acknowledgement store and TOML-based
//!   configuration, so a restart resumes a nag cycle mid-flight
//! - **Backend**: HTTP client for the state query and rest-start command
//!   endpoints, behind a trait seam for testing
//! - **Presenters**: interchangeable alert transports with graceful
//!   degradation
//!
//! ## Key Components
//!
//! - [`ReminderScheduler`]: the state machine
//! - [`ReminderService`]: wires scheduler, store, backend, and presenter
//! - [`AckStore`]: persisted session records
//! - [`ZoneCatalog`]: work/rest duration table

pub mod backend;
pub mod error;
pub mod events;
pub mod presenter;
pub mod reminder;
pub mod service;
pub mod storage;
pub mod zones;

pub use backend::{CycleStatus, HttpBackend, RestStarted, StateBackend, UserCycleState};
pub use error::{BackendError, ConfigError, CoreError, StoreError};
pub use events::{ClearReason, Event};
pub use presenter::{
    ConsolePresenter, PresentError, Presenter, PresenterChain, WebhookPresenter,
};
pub use reminder::{ReminderPhase, ReminderScheduler, ReminderSession};
pub use service::ReminderService;
pub use storage::{AckStore, Config};
pub use zones::{ZoneCatalog, ZoneDefinition};
