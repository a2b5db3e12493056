use chrono::Utc;
use clap::Args;
use restcycle_core::{AckStore, Config, ReminderService};

use super::common;

#[derive(Args)]
pub struct RestArgs {
    /// User to start rest for; defaults to the configured username
    #[arg(long)]
    pub username: Option<String>,
}

pub fn run(args: RestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let username = common::resolve_username(args.username, &config)?;

    let backend = common::build_backend(&config)?;
    let presenter = common::build_presenter(&config);
    let store = AckStore::open()?;
    let mut service = ReminderService::new(backend, presenter, store);

    let now = Utc::now();
    // Pick up any persisted session so the acknowledgement clears it too.
    if let Err(e) = service.resume(&username, now) {
        log::warn!("could not load persisted session: {e}");
    }

    for event in service.start_rest(&username, now)? {
        common::print_event(&event)?;
    }
    Ok(())
}
