/// Data models for the schedule grid.
///
/// This module defines the records the grid is built from:
/// - AppointmentType: Kind of visit, mapped to a display label and color
/// - Doctor / Patient: Read-only reference records, looked up by id
/// - TimeSlot: One fixed-duration row of the grid
/// - Appointment: A booked interval for one doctor and one patient
/// - ViewMode: Day or week rendering

use crate::error::{Result, ScheduleError};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of appointment. Passed through the grid untouched so the renderer
/// can look up its label and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentType {
    Checkup,
    Consultation,
    FollowUp,
    Procedure,
    Emergency,
}

impl AppointmentType {
    /// Convert a string to an AppointmentType value.
    pub fn from_string(value: &str) -> std::result::Result<Self, String> {
        match value.to_lowercase().trim() {
            "checkup" => Ok(AppointmentType::Checkup),
            "consultation" => Ok(AppointmentType::Consultation),
            "follow-up" | "followup" => Ok(AppointmentType::FollowUp),
            "procedure" => Ok(AppointmentType::Procedure),
            "emergency" => Ok(AppointmentType::Emergency),
            _ => Err(format!(
                "Invalid appointment type: '{}'. Must be one of: checkup, consultation, follow-up, procedure, emergency",
                value
            )),
        }
    }
}

/// A doctor whose schedule can be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
}

impl Doctor {
    pub fn new(id: &str, name: &str, specialty: &str) -> Self {
        Doctor {
            id: id.to_string(),
            name: name.to_string(),
            specialty: specialty.to_string(),
        }
    }
}

/// A patient referenced by appointments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
}

impl Patient {
    pub fn new(id: &str, name: &str) -> Self {
        Patient {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// One fixed-duration row of the schedule grid.
///
/// Slots are generated per render pass and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub label: String,
}

impl TimeSlot {
    /// Create a slot starting at `start` and lasting `minutes`.
    pub fn new(start: NaiveDateTime, minutes: i64) -> Self {
        TimeSlot {
            start,
            end: start + Duration::minutes(minutes),
            label: start.format("%H:%M").to_string(),
        }
    }

    /// Calculate the duration of the time slot.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap test against `[start, end)`.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.end && end > self.start
    }

    /// Check if a datetime falls within this time slot.
    pub fn contains(&self, dt: &NaiveDateTime) -> bool {
        &self.start <= dt && dt < &self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.label, self.end.format("%H:%M"))
    }
}

/// A booked appointment. Owned by the data store; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl Appointment {
    /// Create a new appointment with a generated id.
    pub fn new(
        patient_id: &str,
        doctor_id: &str,
        kind: AppointmentType,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Result<Self> {
        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            doctor_id: doctor_id.to_string(),
            kind,
            start_time,
            end_time,
        };
        appointment.validate()?;
        Ok(appointment)
    }

    /// Reject appointments whose end is not after their start.
    pub fn validate(&self) -> Result<()> {
        if self.end_time <= self.start_time {
            return Err(ScheduleError::MalformedAppointment {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Half-open overlap test against `[start, end)`.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_time < end && self.end_time > start
    }
}

/// Which grid the controller renders.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Day,
    Week,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Day => ViewMode::Week,
            ViewMode::Week => ViewMode::Day,
        }
    }
}
