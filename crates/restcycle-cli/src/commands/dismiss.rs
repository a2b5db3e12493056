use chrono::Utc;
use clap::Args;
use restcycle_core::{AckStore, Config, Event};

use super::common;

#[derive(Args)]
pub struct DismissArgs {
    /// User whose alert to dismiss; defaults to the configured username
    #[arg(long)]
    pub username: Option<String>,
}

/// Store-level dismissal: updates the persisted record so any resuming
/// watcher re-arms from the dismissal instead of the original deadline.
/// A live watch process learns about rest via backend polling, which is
/// authoritative either way.
pub fn run(args: DismissArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let username = common::resolve_username(args.username, &config)?;

    let store = AckStore::open()?;
    let Some(mut session) = store.load(&username)? else {
        println!("no active reminder session for '{username}'");
        return Ok(());
    };

    session.dismissed_at = Utc::now();
    store.save(&session)?;

    common::print_event(&Event::ReminderDismissed {
        username,
        reminder_count: session.reminder_count,
        at: session.dismissed_at,
    })
}
