use chrono::Utc;
use clap::Args;
use restcycle_core::{AckStore, Config, StateBackend};

use super::common;

#[derive(Args)]
pub struct StatusArgs {
    /// User to query; defaults to the configured username
    #[arg(long)]
    pub username: Option<String>,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let username = common::resolve_username(args.username, &config)?;
    let backend = common::build_backend(&config)?;

    let state = backend.fetch_state(&username)?;
    let session = AckStore::open()?.load(&username)?;

    // Display-only: the reminder machine itself never uses wall clocks.
    let clock_offset_secs = match backend.server_time() {
        Ok(ts) => Some(ts - Utc::now().timestamp()),
        Err(e) => {
            log::debug!("server time unavailable: {e}");
            None
        }
    };

    let snapshot = serde_json::json!({
        "username": username,
        "status": state.status,
        "zone": state.zone,
        "most_stringent_zone": state.most_stringent_zone,
        "start_time": state.start_time,
        "end_time": state.end_time,
        "work_completed": state.work_completed,
        "pending_rest": state.pending_rest,
        "reminder_count": session.as_ref().map(|s| s.reminder_count).unwrap_or(0),
        "phase": session.as_ref().map(|s| s.phase),
        "server_clock_offset_secs": clock_offset_secs,
    });
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
