/// Appointment queries over a read-only store.
///
/// The service filters by doctor and date, and hands back appointments
/// sorted by start time (ties broken by id) so grids render the same way
/// every time.

use crate::calendar::week_start;
use crate::error::{Result, ScheduleError};
use crate::models::{Appointment, Doctor, Patient, ViewMode};
use crate::store::AppointmentStore;
use chrono::{Duration, NaiveDate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Dates a single query covers. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryWindow {
    Day(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl QueryWindow {
    /// Day view queries the anchor date; week view queries the Monday-based
    /// week containing it.
    pub fn for_view(view: ViewMode, anchor: NaiveDate) -> Self {
        match view {
            ViewMode::Day => QueryWindow::Day(anchor),
            ViewMode::Week => {
                let start = week_start(anchor);
                QueryWindow::Range {
                    start,
                    end: start + Duration::days(6),
                }
            }
        }
    }

    pub fn start(&self) -> NaiveDate {
        match self {
            QueryWindow::Day(date) => *date,
            QueryWindow::Range { start, .. } => *start,
        }
    }

    pub fn end(&self) -> NaiveDate {
        match self {
            QueryWindow::Day(date) => *date,
            QueryWindow::Range { end, .. } => *end,
        }
    }
}

/// Shared flag a superseded query can observe.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ScheduleError::QueryCancelled);
        }
        Ok(())
    }
}

/// Everything one selection needs from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub doctor: Option<Doctor>,
    pub appointments: Vec<Appointment>,
}

pub struct AppointmentQueryService<S> {
    store: S,
}

impl<S: AppointmentStore> AppointmentQueryService<S> {
    pub fn new(store: S) -> Self {
        AppointmentQueryService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a doctor for the schedule header. Unknown ids yield `None`.
    pub fn doctor_by_id(&self, doctor_id: &str) -> Result<Option<Doctor>> {
        self.store.doctor(doctor_id)
    }

    pub fn patient_by_id(&self, patient_id: &str) -> Result<Option<Patient>> {
        self.store.patient(patient_id)
    }

    /// Appointments for one doctor on one date.
    pub fn by_doctor_and_date(&self, doctor_id: &str, date: NaiveDate) -> Result<Vec<Appointment>> {
        self.by_doctor_and_date_range(doctor_id, date, date)
    }

    /// Appointments for one doctor starting within `[start, end]`.
    ///
    /// An inverted range yields nothing rather than an error.
    pub fn by_doctor_and_date_range(
        &self,
        doctor_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        if start > end {
            debug!(%start, %end, "inverted query range");
            return Ok(Vec::new());
        }

        let mut appointments: Vec<Appointment> = self
            .store
            .appointments_between(doctor_id, start, end)?
            .into_iter()
            .filter(|apt| apt.doctor_id == doctor_id)
            .collect();

        appointments.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then_with(|| a.id.cmp(&b.id))
        });

        debug!(doctor_id, %start, %end, count = appointments.len(), "queried appointments");
        Ok(appointments)
    }

    /// Run the reads for a window, bailing out if `cancel` is set.
    pub fn fetch(
        &self,
        doctor_id: &str,
        window: QueryWindow,
        cancel: &CancelToken,
    ) -> Result<QueryOutcome> {
        cancel.check()?;

        let doctor = self.doctor_by_id(doctor_id)?;
        let appointments = match window {
            QueryWindow::Day(date) => self.by_doctor_and_date(doctor_id, date)?,
            QueryWindow::Range { start, end } => {
                self.by_doctor_and_date_range(doctor_id, start, end)?
            }
        };

        cancel.check()?;
        Ok(QueryOutcome {
            doctor,
            appointments,
        })
    }
}
