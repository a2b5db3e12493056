use std::time::{Duration, Instant};

use chrono::Utc;
use clap::Args;
use restcycle_core::{AckStore, Config, ReminderService};

use super::common;

#[derive(Args)]
pub struct WatchArgs {
    /// User to watch; defaults to the configured username
    #[arg(long)]
    pub username: Option<String>,
    /// Poll interval in seconds (overrides config)
    #[arg(long)]
    pub interval: Option<u64>,
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let username = common::resolve_username(args.username, &config)?;
    let interval = args.interval.unwrap_or(config.poll.interval_secs).max(1);
    if !(2..=5).contains(&interval) {
        log::warn!("poll interval {interval}s is outside the recommended 2-5s range");
    }

    let backend = common::build_backend(&config)?;
    let presenter = common::build_presenter(&config);
    let store = AckStore::open()?;
    let mut service = ReminderService::new(backend, presenter, store);

    // Pick up a mid-flight nag cycle from a previous run.
    if let Some(event) = service.resume(&username, Utc::now())? {
        common::print_event(&event)?;
    }

    let mut last_poll: Option<Instant> = None;
    loop {
        let now = Utc::now();
        let poll_due = last_poll.map_or(true, |t| t.elapsed() >= Duration::from_secs(interval));
        if poll_due {
            last_poll = Some(Instant::now());
            if let Some(event) = service.poll(&username, now) {
                common::print_event(&event)?;
            }
        }
        for event in service.tick(now) {
            common::print_event(&event)?;
        }
        std::thread::sleep(Duration::from_secs(1));
    }
}
