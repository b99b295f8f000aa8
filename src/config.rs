/// Calendar configuration and the appointment type display mapping.

use crate::error::{Result, ScheduleError};
use crate::models::AppointmentType;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_START_HOUR: u32 = 8;
const DEFAULT_END_HOUR: u32 = 18;
const DEFAULT_SLOT_DURATION: i64 = 30;

/// Daily window and step used to generate the slot grid.
///
/// Constructed once at startup and never mutated. Only validated values
/// can be built, so every other module can trust the invariants
/// `slot_duration > 0` and `start_hour < end_hour <= 24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarConfig {
    start_hour: u32,
    end_hour: u32,
    slot_duration: i64,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawCalendarConfig {
    start_hour: u32,
    end_hour: u32,
    slot_duration: i64,
}

impl Default for RawCalendarConfig {
    fn default() -> Self {
        RawCalendarConfig {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            slot_duration: DEFAULT_SLOT_DURATION,
        }
    }
}

impl CalendarConfig {
    /// Build a validated configuration.
    pub fn new(start_hour: u32, end_hour: u32, slot_duration: i64) -> Result<Self> {
        if slot_duration <= 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "slot duration must be positive, got {}",
                slot_duration
            )));
        }
        if end_hour <= start_hour {
            return Err(ScheduleError::InvalidConfig(format!(
                "end hour {} must be after start hour {}",
                end_hour, start_hour
            )));
        }
        if end_hour > 24 {
            return Err(ScheduleError::InvalidConfig(format!(
                "end hour {} is past midnight",
                end_hour
            )));
        }

        Ok(CalendarConfig {
            start_hour,
            end_hour,
            slot_duration,
        })
    }

    /// Parse a JSON document such as `{"startHour": 8, "endHour": 18, "slotDuration": 30}`.
    /// Missing fields take their defaults.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawCalendarConfig = serde_json::from_str(content)?;
        Self::new(raw.start_hour, raw.end_hour, raw.slot_duration)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// Slot length in minutes.
    pub fn slot_duration(&self) -> i64 {
        self.slot_duration
    }

    /// Number of whole slots that fit in the daily window.
    pub fn slots_per_day(&self) -> usize {
        let window = i64::from(self.end_hour - self.start_hour) * 60;
        (window / self.slot_duration) as usize
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            slot_duration: DEFAULT_SLOT_DURATION,
        }
    }
}

/// How the renderer shows one appointment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDisplay {
    pub label: &'static str,
    pub color: &'static str,
}

impl AppointmentType {
    pub fn display(&self) -> TypeDisplay {
        match self {
            AppointmentType::Checkup => TypeDisplay {
                label: "Checkup",
                color: "#3b82f6",
            },
            AppointmentType::Consultation => TypeDisplay {
                label: "Consultation",
                color: "#8b5cf6",
            },
            AppointmentType::FollowUp => TypeDisplay {
                label: "Follow-up",
                color: "#10b981",
            },
            AppointmentType::Procedure => TypeDisplay {
                label: "Procedure",
                color: "#f59e0b",
            },
            AppointmentType::Emergency => TypeDisplay {
                label: "Emergency",
                color: "#ef4444",
            },
        }
    }
}
