//! Heat-stress zone catalog.
//!
//! Static table mapping a zone identifier to its work and rest durations,
//! plus the stringency ordering used when the backend reports the harshest
//! zone seen during a cycle. Pure data; absence of a zone is a normal case
//! and falls back to fixed defaults, never an error.

use serde::{Deserialize, Serialize};

/// Rest duration in minutes applied to any zone id not in the catalog.
pub const DEFAULT_REST_MINUTES: f64 = 15.0;
/// Work duration in minutes applied to any zone id not in the catalog.
pub const DEFAULT_WORK_MINUTES: f64 = 60.0;

/// A named heat-stress category with fixed work/rest durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneDefinition {
    pub id: String,
    /// Durations are fractional minutes -- the test zone runs in seconds.
    pub work_minutes: f64,
    pub rest_minutes: f64,
    /// Position in the stringency hierarchy; higher is harsher.
    pub stringency: u8,
}

/// Immutable zone table, defined at process start.
#[derive(Debug, Clone)]
pub struct ZoneCatalog {
    zones: Vec<ZoneDefinition>,
}

impl ZoneCatalog {
    /// The standard WBGT flag table.
    pub fn builtin() -> Self {
        fn zone(id: &str, work_minutes: f64, rest_minutes: f64, stringency: u8) -> ZoneDefinition {
            ZoneDefinition {
                id: id.to_string(),
                work_minutes,
                rest_minutes,
                stringency,
            }
        }
        Self {
            zones: vec![
                zone("white", 60.0, 15.0, 0),
                zone("green", 45.0, 15.0, 1),
                zone("yellow", 30.0, 15.0, 2),
                zone("red", 30.0, 30.0, 3),
                zone("black", 15.0, 30.0, 4),
                // 7 seconds work, 10 seconds rest
                zone("test", 7.0 / 60.0, 10.0 / 60.0, 6),
                zone("cut-off", 0.0, 30.0, 5),
            ],
        }
    }

    pub fn get(&self, zone_id: &str) -> Option<&ZoneDefinition> {
        self.zones.iter().find(|z| z.id == zone_id)
    }

    pub fn zones(&self) -> &[ZoneDefinition] {
        &self.zones
    }

    /// Rest duration for a zone, in minutes. Unknown ids get the default.
    pub fn rest_minutes_for(&self, zone_id: &str) -> f64 {
        self.get(zone_id)
            .map(|z| z.rest_minutes)
            .unwrap_or(DEFAULT_REST_MINUTES)
    }

    /// Work duration for a zone, in minutes. Unknown ids get the default.
    pub fn work_minutes_for(&self, zone_id: &str) -> f64 {
        self.get(zone_id)
            .map(|z| z.work_minutes)
            .unwrap_or(DEFAULT_WORK_MINUTES)
    }

    /// The harsher of two zone ids. Unknown ids rank below every known
    /// zone; ties keep the first argument.
    pub fn more_stringent<'a>(&self, a: &'a str, b: &'a str) -> &'a str {
        if self.stringency_of(b) > self.stringency_of(a) {
            b
        } else {
            a
        }
    }

    fn stringency_of(&self, zone_id: &str) -> i32 {
        self.get(zone_id).map(|z| z.stringency as i32).unwrap_or(-1)
    }
}

impl Default for ZoneCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Render a fractional-minute duration the way the dashboard logs it:
/// sub-minute durations in whole seconds, whole minutes without decimals.
pub fn format_duration(minutes: f64) -> String {
    if minutes < 1.0 {
        format!("{} seconds", (minutes * 60.0).round() as u64)
    } else if minutes.fract() == 0.0 {
        format!("{} minutes", minutes as u64)
    } else {
        format!("{minutes:.1} minutes")
    }
}
