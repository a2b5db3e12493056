//! Durable acknowledgement state.
//!
//! One row per username holding the current reminder session. Every
//! mutation overwrites the whole row in a single statement so a crash
//! between writes can never leave a half-updated record; clearing a
//! session deletes the row entirely. A reload reads the row back and
//! hands it to the scheduler's restore path.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::StoreError;
use crate::reminder::{ReminderPhase, ReminderSession};

/// SQLite-backed store for persisted reminder sessions.
pub struct AckStore {
    conn: Connection,
}

impl AckStore {
    /// Open the store at `~/.config/restcycle/restcycle.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::DataDir(e.to_string()))?;
        Self::open_at(&dir.join("restcycle.db"))
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &std::path::Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (tests, ephemeral watchers).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS reminder_sessions (
                username       TEXT PRIMARY KEY,
                zone           TEXT NOT NULL,
                rest_minutes   REAL NOT NULL,
                dismissed_at   TEXT NOT NULL,
                reminder_count INTEGER NOT NULL,
                phase          TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Persist a session, replacing any previous record wholesale.
    pub fn save(&self, session: &ReminderSession) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO reminder_sessions
             (username, zone, rest_minutes, dismissed_at, reminder_count, phase)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.username,
                session.zone,
                session.rest_minutes,
                session.dismissed_at.to_rfc3339(),
                session.reminder_count,
                phase_to_str(session.phase),
            ],
        )?;
        Ok(())
    }

    /// Load the persisted session for a user, if any.
    pub fn load(&self, username: &str) -> Result<Option<ReminderSession>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT username, zone, rest_minutes, dismissed_at, reminder_count, phase
                 FROM reminder_sessions WHERE username = ?1",
                params![username],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, u32>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((username, zone, rest_minutes, dismissed_at, reminder_count, phase)) = row else {
            return Ok(None);
        };
        let dismissed_at = DateTime::parse_from_rfc3339(&dismissed_at)
            .map_err(|e| StoreError::CorruptRecord {
                username: username.clone(),
                message: format!("bad dismissed_at: {e}"),
            })?
            .with_timezone(&Utc);
        let phase = phase_from_str(&phase, &username)?;
        Ok(Some(ReminderSession {
            username,
            zone,
            rest_minutes,
            dismissed_at,
            reminder_count,
            phase,
            next_due_at: None,
        }))
    }

    /// Remove a user's persisted session. No-op when absent.
    pub fn remove(&self, username: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM reminder_sessions WHERE username = ?1",
            params![username],
        )?;
        Ok(())
    }
}

fn phase_to_str(phase: ReminderPhase) -> &'static str {
    match phase {
        ReminderPhase::ArmedFirst => "armed_first",
        ReminderPhase::Periodic => "periodic",
        ReminderPhase::Cleared => "cleared",
    }
}

fn phase_from_str(s: &str, username: &str) -> Result<ReminderPhase, StoreError> {
    match s {
        "armed_first" => Ok(ReminderPhase::ArmedFirst),
        "periodic" => Ok(ReminderPhase::Periodic),
        "cleared" => Ok(ReminderPhase::Cleared),
        other => Err(StoreError::CorruptRecord {
            username: username.to_string(),
            message: format!("unknown phase '{other}'"),
        }),
    }
}
