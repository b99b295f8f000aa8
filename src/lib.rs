//! Doctor schedule grid.
//!
//! Generates day and week slot grids, places a doctor's appointments into
//! them, and keeps the displayed state in step with the caller's selection.

pub mod calendar;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod placement;
pub mod query;
pub mod store;

pub use config::CalendarConfig;
pub use controller::{ScheduleController, ScheduleLayout, ScheduleState, Selection};
pub use error::{Result, ScheduleError};
pub use models::{Appointment, AppointmentType, Doctor, Patient, TimeSlot, ViewMode};
pub use query::{AppointmentQueryService, QueryWindow};
pub use store::{AppointmentStore, MockStore};
