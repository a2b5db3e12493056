//! The reminder layer: one session per user, one state machine over all
//! of them.

mod scheduler;
mod session;

pub use scheduler::ReminderScheduler;
pub use session::{
    ReminderPhase, ReminderSession, FIRST_REMINDER_DELAY_SECS, REMINDER_INTERVAL_SECS,
};
